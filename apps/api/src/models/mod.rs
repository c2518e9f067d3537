pub mod application;
pub mod document;
pub mod role;
pub mod user;

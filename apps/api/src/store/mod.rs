//! Record Store — the storage seam for every read and write path in the roles domain.
//!
//! `PgRecordStore` is the production backend. Unit tests run against the
//! in-memory store so the aggregation logic never needs a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::ApplicationRow;
use crate::models::document::{DocumentContentRow, DocumentMetaRow};
use crate::models::role::{NewRole, QuestionWithAnswers, RoleStatsRow, RoleWithCountRow};
use crate::models::user::UserRow;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Data integrity violation: {0}")]
    Integrity(String),

    #[error("Store did not answer before the request deadline")]
    Timeout,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The two fixed question sets a role owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    CandidateEvaluation,
    RoleRelated,
}

/// Half-open creation-time window `[from, until)` used to filter roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All roles ordered by title, optionally restricted to a creation window.
    async fn list_roles(&self, window: Option<CreatedWindow>) -> StoreResult<Vec<RoleWithCountRow>>;

    async fn find_role(&self, role_id: i32) -> StoreResult<Option<RoleWithCountRow>>;

    async fn role_stats(&self) -> StoreResult<RoleStatsRow>;

    /// Inserts the role and both question sets atomically. Returns the new role id.
    async fn create_role(&self, role: &NewRole) -> StoreResult<i32>;

    /// Applications for a role, highest overall rating first, ties by application id.
    async fn applications_for_role(&self, role_id: i32) -> StoreResult<Vec<ApplicationRow>>;

    /// The application only if it belongs to the given role.
    async fn find_application(
        &self,
        role_id: i32,
        application_id: i32,
    ) -> StoreResult<Option<ApplicationRow>>;

    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<UserRow>>;

    /// Every question of `kind` for the role (ordered by question id), each with
    /// the answer rows recorded for `application_id` only. Questions without
    /// answers are still returned.
    async fn questions_with_answers(
        &self,
        kind: QuestionKind,
        role_id: i32,
        application_id: i32,
    ) -> StoreResult<Vec<QuestionWithAnswers>>;

    /// Document metadata for a user, newest first.
    async fn documents_for_user(&self, user_id: Uuid) -> StoreResult<Vec<DocumentMetaRow>>;

    async fn document_content(&self, document_id: Uuid) -> StoreResult<Option<DocumentContentRow>>;
}

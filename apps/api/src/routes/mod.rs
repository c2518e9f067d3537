pub mod health;

use axum::{
    routing::get,
    Router,
};

use crate::documents::handlers as documents;
use crate::roles::handlers as roles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Role catalog
        .route(
            "/api/v1/roles",
            get(roles::handle_list_roles).post(roles::handle_create_role),
        )
        .route("/api/v1/roles/stats", get(roles::handle_role_stats))
        .route("/api/v1/roles/:role_id", get(roles::handle_get_role))
        // Applicant list and evaluation view
        .route(
            "/api/v1/roles/:role_id/applications",
            get(roles::handle_list_applications),
        )
        .route(
            "/api/v1/roles/:role_id/applications/:application_id",
            get(roles::handle_candidate_evaluation),
        )
        // Document bytes
        .route(
            "/api/v1/documents/:document_id",
            get(documents::handle_get_document),
        )
        .with_state(state)
}

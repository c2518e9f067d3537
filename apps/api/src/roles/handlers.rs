use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::roles::applications::{list_applications, RoleApplicationData};
use crate::roles::catalog::{
    self, CreateRoleRequest, CreateRoleResponse, RoleStats, RoleSummary,
};
use crate::roles::evaluation::{candidate_evaluation, CandidateEvaluationData};
use crate::roles::within_deadline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(
    State(state): State<AppState>,
    Query(params): Query<YearQuery>,
) -> Result<Json<Vec<RoleSummary>>, AppError> {
    let roles = within_deadline(
        state.config.request_timeout,
        catalog::list_roles(state.store.as_ref(), params.year),
    )
    .await?;
    Ok(Json(roles))
}

/// POST /api/v1/roles
pub async fn handle_create_role(
    State(state): State<AppState>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<Json<CreateRoleResponse>, AppError> {
    let response = within_deadline(
        state.config.request_timeout,
        catalog::create_role(state.store.as_ref(), req),
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/roles/stats
pub async fn handle_role_stats(
    State(state): State<AppState>,
) -> Result<Json<RoleStats>, AppError> {
    let stats = within_deadline(
        state.config.request_timeout,
        catalog::role_stats(state.store.as_ref()),
    )
    .await?;
    Ok(Json(stats))
}

/// GET /api/v1/roles/:role_id
pub async fn handle_get_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<Json<RoleSummary>, AppError> {
    let role = within_deadline(
        state.config.request_timeout,
        catalog::get_role(state.store.as_ref(), &role_id),
    )
    .await?;
    Ok(Json(role))
}

/// GET /api/v1/roles/:role_id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<Json<Vec<RoleApplicationData>>, AppError> {
    let applications = within_deadline(
        state.config.request_timeout,
        list_applications(state.store.as_ref(), &role_id),
    )
    .await?;
    Ok(Json(applications))
}

/// GET /api/v1/roles/:role_id/applications/:application_id
pub async fn handle_candidate_evaluation(
    State(state): State<AppState>,
    Path((role_id, application_id)): Path<(String, String)>,
) -> Result<Json<CandidateEvaluationData>, AppError> {
    let evaluation = within_deadline(
        state.config.request_timeout,
        candidate_evaluation(state.store.as_ref(), &role_id, &application_id),
    )
    .await?;

    evaluation.map(Json).ok_or_else(|| {
        AppError::NotFound(format!(
            "Application {application_id} not found for role {role_id}"
        ))
    })
}

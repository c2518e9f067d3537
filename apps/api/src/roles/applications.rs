use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::roles::parse_role_id;
use crate::roles::reviewer::{ranked_name, resolve_reviewer};
use crate::roles::scores::ApplicationMetrics;
use crate::store::RecordStore;

/// One row of a role's applicant table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleApplicationData {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub metrics: ApplicationMetrics,
    pub reviewer: String,
    pub status: String,
    pub overall_rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_comment: Option<String>,
}

impl RoleApplicationData {
    fn from_row(row: ApplicationRow, reviewer: String) -> Self {
        Self {
            id: row.application_id.to_string(),
            name: ranked_name(row.candidate_rank.as_deref(), &row.candidate_name),
            metrics: ApplicationMetrics::from_row(&row),
            reviewer,
            status: row.status,
            overall_rating: row.overall_rating,
            ai_summary: row.ai_summary,
            reviewer_comment: row.reviewer_comment,
        }
    }
}

/// Builds a role's applicant list, highest overall rating first.
///
/// Reviewer names are resolved concurrently, one lookup per row; a failed
/// lookup only affects its own row. A failed application fetch aborts the
/// whole list.
pub async fn list_applications(
    store: &dyn RecordStore,
    role_id: &str,
) -> Result<Vec<RoleApplicationData>, AppError> {
    let role_id = parse_role_id(role_id)?;
    let rows = store.applications_for_role(role_id).await?;

    let reviewers = join_all(
        rows.iter()
            .map(|row| resolve_reviewer(store, row.reviewer_id, row.application_id)),
    )
    .await;

    debug!("Assembled {} applications for role {role_id}", rows.len());

    Ok(rows
        .into_iter()
        .zip(reviewers)
        .map(|(row, reviewer)| RoleApplicationData::from_row(row, reviewer))
        .collect())
}

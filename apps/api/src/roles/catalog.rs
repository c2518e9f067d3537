use chrono::{Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::role::{NewRole, RoleWithCountRow};
use crate::roles::parse_role_id;
use crate::store::{CreatedWindow, RecordStore};

pub const ROLE_CREATED_MESSAGE: &str = "The new role was created successfully.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub id: String,
    pub title: String,
    pub candidates: i64,
    pub active: bool,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub year_of_experience: String,
}

impl From<RoleWithCountRow> for RoleSummary {
    fn from(row: RoleWithCountRow) -> Self {
        let role = row.role;
        Self {
            id: role.role_id.to_string(),
            title: role.title,
            candidates: row.application_count,
            // Roles have no lifecycle yet; every stored role is open.
            active: true,
            year: role.created_at.year(),
            department: role.department.filter(|d| !d.is_empty()),
            description: Some(role.description_ai),
            skills: role.skills,
            year_of_experience: role.years_of_experience,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleStats {
    pub total_roles: i64,
    pub total_candidates: i64,
}

/// Role creation payload. Required fields are optional here so a missing
/// field is reported the same way as a blank one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRoleRequest {
    pub role_title: Option<String>,
    pub role_description: Option<String>,
    pub role_description_ai: Option<String>,
    pub years_of_experience: Option<String>,
    pub department: Option<String>,
    pub skills: Option<Vec<String>>,
    pub candidate_evaluation_questions: Option<Vec<String>>,
    pub role_related_questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleResponse {
    pub message: String,
    pub new_role_id: i32,
}

impl CreateRoleRequest {
    pub fn validate(self) -> Result<NewRole, AppError> {
        Ok(NewRole {
            title: required(self.role_title, "job title is required")?,
            description_prompt: required(self.role_description, "job description is required")?,
            description_ai: required(self.role_description_ai, "job description ai is required")?,
            years_of_experience: required(
                self.years_of_experience,
                "years of experience is required",
            )?,
            department: self.department,
            skills: self.skills.unwrap_or_default(),
            candidate_evaluation_questions: self.candidate_evaluation_questions.unwrap_or_default(),
            role_related_questions: self.role_related_questions.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidArgument(message.to_string()))
}

/// `[Jan 1 year, Jan 1 year+1)` in UTC.
pub fn year_window(year: i32) -> Result<CreatedWindow, AppError> {
    let start = |y: i32| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).single();
    match (start(year), year.checked_add(1).and_then(start)) {
        (Some(from), Some(until)) => Ok(CreatedWindow { from, until }),
        _ => Err(AppError::InvalidArgument(format!("year {year} is out of range"))),
    }
}

/// All roles ordered by title, optionally only those created in `year`.
pub async fn list_roles(
    store: &dyn RecordStore,
    year: Option<i32>,
) -> Result<Vec<RoleSummary>, AppError> {
    let window = year.map(year_window).transpose()?;
    let rows = store.list_roles(window).await?;
    Ok(rows.into_iter().map(RoleSummary::from).collect())
}

pub async fn get_role(store: &dyn RecordStore, role_id: &str) -> Result<RoleSummary, AppError> {
    let id = parse_role_id(role_id)?;
    store
        .find_role(id)
        .await?
        .map(RoleSummary::from)
        .ok_or_else(|| AppError::NotFound(format!("Role {id} not found")))
}

pub async fn role_stats(store: &dyn RecordStore) -> Result<RoleStats, AppError> {
    let stats = store.role_stats().await?;
    Ok(RoleStats {
        total_roles: stats.total_roles,
        total_candidates: stats.total_candidates,
    })
}

/// Validates and inserts a role with its question sets in one unit.
pub async fn create_role(
    store: &dyn RecordStore,
    request: CreateRoleRequest,
) -> Result<CreateRoleResponse, AppError> {
    let role = request.validate()?;
    let new_role_id = store.create_role(&role).await?;
    Ok(CreateRoleResponse {
        message: ROLE_CREATED_MESSAGE.to_string(),
        new_role_id,
    })
}

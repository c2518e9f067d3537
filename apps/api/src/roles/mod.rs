//! Roles domain: role catalog, applicant list and per-candidate evaluation view.

pub mod applications;
pub mod catalog;
pub mod evaluation;
pub mod handlers;
pub mod reviewer;
pub mod scores;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::AppError;
use crate::store::StoreError;

/// Parses a role identifier from its path form.
pub fn parse_role_id(raw: &str) -> Result<i32, AppError> {
    parse_key(raw, "role")
}

/// Parses an application identifier from its path form.
pub fn parse_application_id(raw: &str) -> Result<i32, AppError> {
    parse_key(raw, "application")
}

fn parse_key(raw: &str, entity: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidArgument(format!("{entity} id '{raw}' is not a valid identifier")))
}

/// Runs `work` under the request deadline. A breach is an upstream failure;
/// dropping the future cancels any in-flight store calls.
pub async fn within_deadline<T, F>(deadline: Duration, work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Request exceeded its {}ms deadline", deadline.as_millis());
            Err(AppError::Upstream(StoreError::Timeout))
        }
    }
}

use tracing::{debug, warn};
use uuid::Uuid;

use crate::store::RecordStore;

/// Shown when an application has no reviewer or the reviewer can't be resolved.
pub const NO_REVIEWER: &str = "-";

/// `"{rank} {name}"` when a rank is set, else just the name.
pub fn ranked_name(rank: Option<&str>, name: &str) -> String {
    match rank.map(str::trim).filter(|r| !r.is_empty()) {
        Some(rank) => format!("{rank} {name}"),
        None => name.to_string(),
    }
}

/// Best-effort reviewer display name. Never fails: lookup errors are logged
/// and degrade to `NO_REVIEWER` for this row only.
pub async fn resolve_reviewer(
    store: &dyn RecordStore,
    reviewer_id: Option<Uuid>,
    application_id: i32,
) -> String {
    let Some(reviewer_id) = reviewer_id else {
        return NO_REVIEWER.to_string();
    };

    match store.find_user(reviewer_id).await {
        Ok(Some(user)) => ranked_name(user.rank.as_deref(), &user.name),
        Ok(None) => {
            debug!("Reviewer {reviewer_id} for application {application_id} no longer exists");
            NO_REVIEWER.to_string()
        }
        Err(e) => {
            warn!("Failed to fetch reviewer for application {application_id}: {e}");
            NO_REVIEWER.to_string()
        }
    }
}

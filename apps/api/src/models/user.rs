use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A platform user. Candidates and reviewers share this table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub name: String,
    pub rank: Option<String>,
    pub created_at: DateTime<Utc>,
}

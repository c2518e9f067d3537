use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Document metadata exposed on the evaluation view. Bytes are served separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetaRow {
    pub user_document_id: Uuid,
    pub filename: String,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DocumentContentRow {
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
    pub filename: String,
}

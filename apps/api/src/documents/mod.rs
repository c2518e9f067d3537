//! Document byte serving. Content is immutable once stored, so responses are cacheable.

pub mod handlers;

use uuid::Uuid;

use crate::errors::AppError;
use crate::store::RecordStore;

/// Served when a document was stored without a MIME type.
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBytes {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

pub fn parse_document_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        AppError::InvalidArgument(format!("document id '{raw}' is not a valid identifier"))
    })
}

pub async fn fetch_document(
    store: &dyn RecordStore,
    document_id: &str,
) -> Result<DocumentBytes, AppError> {
    let id = parse_document_id(document_id)?;
    let row = store
        .document_content(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    Ok(DocumentBytes {
        bytes: row.content,
        mime_type: row
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        filename: row.filename,
    })
}

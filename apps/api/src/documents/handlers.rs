use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::documents::{fetch_document, DEFAULT_MIME_TYPE};
use crate::errors::AppError;
use crate::roles::within_deadline;
use crate::state::AppState;

const CACHE_CONTROL: &str = "public, max-age=3600";

/// GET /api/v1/documents/:document_id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Response, AppError> {
    let document = within_deadline(
        state.config.request_timeout,
        fetch_document(state.store.as_ref(), &document_id),
    )
    .await?;

    let content_type = HeaderValue::from_str(&document.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIME_TYPE));
    let disposition = HeaderValue::from_str(&content_disposition(&document.filename))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
        ],
        Bytes::from(document.bytes),
    )
        .into_response())
}

/// Inline disposition with the stored filename as a hint. Quotes and
/// backslashes are dropped so the header stays well-formed.
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();
    format!("inline; filename=\"{safe}\"")
}

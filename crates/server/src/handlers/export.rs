//! # Database Export Handler
//!
//! The `GET /export/db` endpoint: offers the entire archive file as a binary
//! attachment, so a user can download the accumulated metadata store.

use super::{AppError, AppState};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::path::Path;
use tracing::info;

/// Handler for downloading the SQLite store file.
///
/// Responds 404 when the store has no on-disk file: either it was never
/// created, or the server runs against an in-memory database.
pub async fn export_db_handler(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let db_url = &app_state.config.db_url;
    let db_path = Path::new(db_url);

    if db_url == ":memory:" || !db_path.exists() {
        return Err(AppError::NotFound(format!(
            "No database file found at '{db_url}'."
        )));
    }

    let bytes = tokio::fs::read(db_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read database file '{db_url}': {e}"))?;

    let file_name = db_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("buildings.db");

    info!(
        "Serving database download: '{file_name}' ({} bytes)",
        bytes.len()
    );

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];

    Ok((headers, bytes).into_response())
}

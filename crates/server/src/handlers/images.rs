//! # Image Ingestion Handler
//!
//! The `POST /images` endpoint: accepts a batch of uploaded images as
//! multipart form data and runs the per-image pipeline — dedup check against
//! the archive, extraction through the configured AI provider, persistence —
//! strictly sequentially, in upload order.
//!
//! Every image produces exactly one entry in the response report, whatever
//! its outcome. A failure on one image never aborts or rolls back the rest
//! of the batch, and nothing is retried.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::config::EXTRACTION_TASK;
use crate::state::ResolvedTask;
use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::Multipart;
use facade::providers::ai::AiProvider;
use facade::{extract_image_fields, InsertOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, info_span, Instrument};

/// MIME type assumed for file parts that do not declare one.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

// --- API Payloads ---

/// The terminal state of one image's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    /// Extracted and archived.
    Persisted,
    /// Skipped before extraction: the archive already holds this filename.
    AlreadyAnalyzed,
    /// Skipped at insert time: another write won the race for this filename.
    DuplicateSkipped,
    /// The AI provider call or its response coercion failed.
    ExtractionFailed,
    /// The archive read or write failed.
    StoreFailed,
    /// The upload part was unusable (e.g., no filename).
    Rejected,
}

/// One report entry per uploaded image, in upload order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageReport {
    pub image_name: String,
    pub status: ImageStatus,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct AnalyzeBatchResponse {
    pub processed: usize,
    pub results: Vec<ImageReport>,
}

struct Upload {
    /// The multipart form field name, used to identify parts that carry
    /// no filename.
    field_name: Option<String>,
    image_name: Option<String>,
    mime_type: String,
    bytes: Vec<u8>,
}

// --- Handler ---

/// Handler for analyzing a batch of uploaded images.
pub async fn analyze_images_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<AnalyzeBatchResponse>>, AppError> {
    // Resolve the extraction task and its provider once per batch.
    let task = app_state.tasks.get(EXTRACTION_TASK).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "Configuration for task '{EXTRACTION_TASK}' not found."
        ))
    })?;
    let provider_name = &task.provider;
    let ai_provider = app_state.ai_providers.get(provider_name).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "Provider '{provider_name}' for task '{EXTRACTION_TASK}' not found in providers map."
        ))
    })?;

    // Drain the multipart stream first so the report preserves upload order
    // even if reading a later part fails the whole request.
    let mut uploads: Vec<Upload> = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        let field_name = field.name().map(str::to_string);
        let image_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        let bytes = field.bytes().await.map_err(anyhow::Error::from)?.to_vec();
        uploads.push(Upload {
            field_name,
            image_name,
            mime_type,
            bytes,
        });
    }

    info!("Received upload batch of {} file(s)", uploads.len());

    let mut results = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        let report = match upload.image_name.as_deref() {
            Some(image_name) => {
                let span = info_span!("analyze", image = %image_name);
                analyze_one(
                    &app_state,
                    task,
                    ai_provider.as_ref(),
                    image_name,
                    &upload.bytes,
                    &upload.mime_type,
                )
                .instrument(span)
                .await
            }
            None => {
                // Nameless file parts still get an addressable report entry:
                // fall back to the form field name so the notice can point
                // at the offending part.
                let label = upload
                    .field_name
                    .clone()
                    .unwrap_or_else(|| "<unnamed part>".to_string());
                ImageReport {
                    image_name: label.clone(),
                    status: ImageStatus::Rejected,
                    message: format!(
                        "Uploaded part '{label}' is missing a filename and was skipped."
                    ),
                }
            }
        };
        results.push(report);
    }

    let response = AnalyzeBatchResponse {
        processed: results.len(),
        results,
    };
    let debug_info = json!({
        "batch_size": uploads.len(),
        "provider": provider_name,
    });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}

/// Runs the pipeline for a single image and reports its terminal state.
///
/// All extraction and storage errors are converted to report entries here;
/// none propagate to the request level.
async fn analyze_one(
    app_state: &AppState,
    task: &ResolvedTask,
    ai_provider: &dyn AiProvider,
    image_name: &str,
    bytes: &[u8],
    mime_type: &str,
) -> ImageReport {
    // Dedup pre-check, so known images never cost an external call. The
    // UNIQUE constraint below remains the backstop for concurrent writers.
    match app_state.sqlite_provider.image_exists(image_name).await {
        Ok(true) => {
            return ImageReport {
                image_name: image_name.to_string(),
                status: ImageStatus::AlreadyAnalyzed,
                message: format!(
                    "Image '{image_name}' has already been analyzed and is in the database."
                ),
            };
        }
        Ok(false) => {}
        Err(e) => {
            return ImageReport {
                image_name: image_name.to_string(),
                status: ImageStatus::StoreFailed,
                message: format!("Failed to check the database for '{image_name}': {e}"),
            };
        }
    }

    info!("Analyzing '{image_name}'");
    let fields = match extract_image_fields(
        ai_provider,
        &task.system_prompt,
        &task.user_prompt,
        bytes,
        mime_type,
    )
    .await
    {
        Ok(fields) => fields,
        Err(e) => {
            return ImageReport {
                image_name: image_name.to_string(),
                status: ImageStatus::ExtractionFailed,
                message: format!("Analysis of '{image_name}' failed: {e}"),
            };
        }
    };

    match app_state
        .sqlite_provider
        .insert_image(image_name, &fields)
        .await
    {
        Ok(InsertOutcome::Inserted) => ImageReport {
            image_name: image_name.to_string(),
            status: ImageStatus::Persisted,
            message: format!("Image '{image_name}' analyzed and archived."),
        },
        Ok(InsertOutcome::DuplicateSkipped) => ImageReport {
            image_name: image_name.to_string(),
            status: ImageStatus::DuplicateSkipped,
            message: format!(
                "Image '{image_name}' already exists in the database and was not added again."
            ),
        },
        Err(e) => ImageReport {
            image_name: image_name.to_string(),
            status: ImageStatus::StoreFailed,
            message: format!("Failed to insert '{image_name}' into the database: {e}"),
        },
    }
}

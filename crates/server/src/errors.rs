use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use facade::FacadeError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the
/// server, allowing them to be converted into appropriate HTTP responses.
/// Per-image pipeline failures never reach this type; they are converted to
/// report entries inside the handler. `AppError` covers request-level
/// failures only (malformed multipart, missing configuration, export).
pub enum AppError {
    /// Errors originating from the `facade` library.
    Facade(FacadeError),
    /// A requested resource (e.g., the database file) does not exist.
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `FacadeError` to `AppError`.
impl From<FacadeError> for AppError {
    fn from(err: FacadeError) -> Self {
        AppError::Facade(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Facade(err) => {
                // Log the original error for debugging purposes
                error!("FacadeError: {:?}", err);
                match err {
                    FacadeError::AiRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    ),
                    FacadeError::AiDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI provider response: {e}"),
                    ),
                    FacadeError::AiApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}"))
                    }
                    FacadeError::AiResponseParse(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("AI provider returned malformed content: {e}"),
                    ),
                    FacadeError::StorageConnection(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage provider connection error: {e}"),
                    ),
                    FacadeError::StorageOperationFailed(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage operation failed: {e}"),
                    ),
                    FacadeError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                }
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, msg)
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}

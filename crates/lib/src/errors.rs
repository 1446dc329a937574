use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI provider failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider returned malformed content: {0}")]
    AiResponseParse(#[from] serde_json::Error),
    #[error("Storage provider connection error: {0}")]
    StorageConnection(String),
    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),
}

impl FacadeError {
    /// True when the error originated in the extraction path (transport,
    /// provider API, or response coercion) rather than in local storage.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            FacadeError::ReqwestClientBuild(_)
                | FacadeError::AiRequest(_)
                | FacadeError::AiDeserialization(_)
                | FacadeError::AiApi(_)
                | FacadeError::AiResponseParse(_)
        )
    }
}

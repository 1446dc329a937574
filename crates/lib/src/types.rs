use serde::{Deserialize, Serialize};

/// The coerced extraction result for one image, ready for persistence.
///
/// All three fields are plain single-line strings at this point: list-shaped
/// provider output has already been flattened and missing keys replaced with
/// the sentinel defaults from [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFields {
    pub title: String,
    pub buildings: String,
    pub description: String,
}

/// An image encoded for embedding in a provider request payload.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Base64-encoded image bytes.
    pub data: String,
    /// MIME type the data is tagged with, e.g. `image/jpeg`.
    pub mime_type: String,
}

impl ImagePayload {
    /// Encodes raw image bytes into a transport-safe payload.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        use base64::Engine;
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }

    /// The `data:` URL form used by OpenAI-compatible chat APIs.
    pub fn as_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// The outcome of an insert attempt against the image archive.
///
/// A uniqueness violation on `image_name` is a normal, non-exceptional
/// result; only genuine storage failures surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicateSkipped,
}

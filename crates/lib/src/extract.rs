//! # Extraction Adapter
//!
//! Turns one uploaded image into persisted metadata fields: encodes the
//! bytes for transport, sends the fixed instruction to the AI provider, and
//! coerces the best-effort structured response into plain strings.
//!
//! The provider contract is best-effort only. Models sometimes ignore the
//! "single short line" instruction and return lists, wrap the object in
//! markdown fences, or omit keys entirely; the coercion here is the
//! documented recovery policy for all of that. One attempt per image, no
//! retries: a failure is terminal for that image in that run.

use crate::{
    constants::{NO_BUILDINGS, NO_DESCRIPTION, NO_TITLE},
    errors::FacadeError,
    providers::ai::AiProvider,
    types::{ImageFields, ImagePayload},
};
use serde_json::Value;
use tracing::debug;

/// Sends one image to the provider and coerces the response fields.
pub async fn extract_image_fields(
    provider: &dyn AiProvider,
    system_prompt: &str,
    user_prompt: &str,
    image_bytes: &[u8],
    mime_type: &str,
) -> Result<ImageFields, FacadeError> {
    let image = ImagePayload::from_bytes(image_bytes, mime_type);

    let raw_response = provider
        .describe_image(system_prompt, user_prompt, &image)
        .await?;
    debug!("Raw extraction response: {}", raw_response);

    coerce_response(&raw_response)
}

/// Parses the provider's raw text into [`ImageFields`], applying the
/// sentinel defaults and list flattening.
pub fn coerce_response(raw_response: &str) -> Result<ImageFields, FacadeError> {
    let cleaned_response = raw_response
        .trim()
        .strip_prefix("```json")
        .unwrap_or(raw_response)
        .strip_suffix("```")
        .unwrap_or(raw_response)
        .trim();

    let parsed: Value = serde_json::from_str(cleaned_response)?;

    Ok(ImageFields {
        title: field_as_line(parsed.get("title"), NO_TITLE),
        buildings: field_as_line(parsed.get("buildings"), NO_BUILDINGS),
        description: field_as_line(parsed.get("description"), NO_DESCRIPTION),
    })
}

/// Coerces one response field to a single line of text.
///
/// Strings pass through verbatim. Arrays are flattened into a
/// comma-separated line. Missing or null fields become the sentinel default.
fn field_as_line(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_complete_response() {
        let fields = coerce_response(
            r#"{"title": "Harbor front", "buildings": "Warehouse", "description": "Cranes at dawn"}"#,
        )
        .unwrap();
        assert_eq!(fields.title, "Harbor front");
        assert_eq!(fields.buildings, "Warehouse");
        assert_eq!(fields.description, "Cranes at dawn");
    }

    #[test]
    fn test_missing_fields_get_sentinel_defaults() {
        let fields = coerce_response(r#"{"title": "X"}"#).unwrap();
        assert_eq!(fields.title, "X");
        assert_eq!(fields.buildings, NO_BUILDINGS);
        assert_eq!(fields.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_null_field_gets_sentinel_default() {
        let fields = coerce_response(r#"{"title": null, "buildings": "B"}"#).unwrap();
        assert_eq!(fields.title, NO_TITLE);
        assert_eq!(fields.buildings, "B");
    }

    #[test]
    fn test_list_fields_are_flattened() {
        let fields = coerce_response(
            r#"{"title": "T", "buildings": ["A", "B"], "description": ["One", "Two"]}"#,
        )
        .unwrap();
        assert_eq!(fields.buildings, "A, B");
        assert_eq!(fields.description, "One, Two");
    }

    #[test]
    fn test_markdown_fences_are_stripped() {
        let raw = "```json\n{\"title\": \"Fenced\"}\n```";
        let fields = coerce_response(raw).unwrap();
        assert_eq!(fields.title, "Fenced");
    }

    #[test]
    fn test_unparseable_response_is_an_error() {
        let err = coerce_response("I could not analyze this image.").unwrap_err();
        assert!(matches!(err, FacadeError::AiResponseParse(_)));
        assert!(err.is_extraction_error());
    }

    #[test]
    fn test_data_url_encoding() {
        let payload = ImagePayload::from_bytes(b"abc", "image/png");
        assert_eq!(payload.data, "YWJj");
        assert_eq!(payload.as_data_url(), "data:image/png;base64,YWJj");
    }
}

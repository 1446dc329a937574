//! # Image Metadata Extraction
//!
//! This crate provides the core building blocks for analyzing uploaded images
//! with a multimodal AI provider and archiving the extracted fields (title,
//! buildings, description) in a local SQLite database, keyed by filename.

pub mod constants;
pub mod errors;
pub mod extract;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::FacadeError;
pub use extract::extract_image_fields;
pub use types::{ImageFields, ImagePayload, InsertOutcome};

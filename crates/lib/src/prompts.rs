//! # Extraction Prompts
//!
//! The fixed instructions sent to the multimodal provider for every image.
//! The system prompt pins the output contract to a flat JSON object; the
//! coercion in `extract` remains the recovery policy when a provider ignores
//! the "single short line" instruction and returns lists anyway.

pub const IMAGE_EXTRACTION_SYSTEM_PROMPT: &str = "You are an expert at analyzing images. \
Extract the title, buildings, and a description from the image. \
Respond with a JSON object with the following keys: title, buildings, description. \
For each key (title, buildings, description) you only give a single short line of text. \
You never use nested JSON objects.";

pub const IMAGE_EXTRACTION_USER_PROMPT: &str = "Describe the image.";

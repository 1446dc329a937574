//! Shared constants for the image archive.

/// The table holding one row per successfully analyzed image.
pub const IMAGE_DATA_TABLE: &str = "image_data";

/// Placeholder stored when the model response omits the `title` key.
pub const NO_TITLE: &str = "No title";

/// Placeholder stored when the model response omits the `buildings` key.
pub const NO_BUILDINGS: &str = "No buildings identified";

/// Placeholder stored when the model response omits the `description` key.
pub const NO_DESCRIPTION: &str = "No description";

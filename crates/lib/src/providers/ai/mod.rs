pub mod gemini;
pub mod local;

use crate::{errors::FacadeError, types::ImagePayload};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a multimodal AI provider.
///
/// This defines a common interface for describing an image with different
/// vision-capable Large Language Models (e.g., Gemini, OpenAI-compatible
/// local models or hosted services).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response for a system/user prompt pair plus one image.
    ///
    /// The result is the provider's raw text response; callers are
    /// responsible for parsing any structure out of it.
    async fn describe_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, FacadeError>;
}

dyn_clone::clone_trait_object!(AiProvider);

use anyhow::Result;
use async_trait::async_trait;
use facade::errors::FacadeError;
use facade::providers::ai::AiProvider;
use facade::types::ImagePayload;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use turso::Database;

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub db: Database,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the schema.
    pub async fn new() -> Result<Self> {
        let db = turso::Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        // Initialize the schema using the shared SQL constants.
        for statement in facade::providers::db::sqlite::sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }

        Ok(Self { db })
    }
}

/// A few bytes with a JPEG magic number, good enough for upload tests since
/// the pipeline never decodes image content.
pub fn fake_jpeg(seed: u8) -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, seed, seed.wrapping_add(1)]
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific image.
    /// The key should be a unique substring of the base64 image data.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded `(system_prompt, mime_type)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn describe_image(
        &self,
        system_prompt: &str,
        _user_prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, FacadeError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((system_prompt.to_string(), image.mime_type.clone()));

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if image.data.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(FacadeError::AiApi(
            "MockAiProvider: No response programmed for this image payload.".to_string(),
        ))
    }
}

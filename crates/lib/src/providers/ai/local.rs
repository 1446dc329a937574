use crate::{errors::FacadeError, providers::ai::AiProvider, types::ImagePayload};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;

// --- OpenAI-compatible request and response structures ---
//
// The user turn carries mixed content (a text part plus an `image_url` part
// with a base64 data URL), so message content is a `Value` rather than a
// plain string. This is the shape Groq and local OpenAI-compatible runtimes
// accept for vision models.

#[derive(Serialize)]
struct LocalAiRequest<'a> {
    messages: Vec<LocalAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    max_tokens: i32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct LocalAiMessage {
    role: String,
    content: Value,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponse {
    choices: Vec<LocalAiChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiChoice {
    message: LocalAiMessage,
}

// --- Local Provider implementation ---

/// A provider for interacting with a local or OpenAI-compatible API.
#[derive(Clone, Debug)]
pub struct LocalAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl LocalAiProvider {
    /// Creates a new `LocalAiProvider`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, FacadeError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(FacadeError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for LocalAiProvider {
    /// Describes an image using a local or OpenAI-compatible chat API.
    async fn describe_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, FacadeError> {
        let messages = vec![
            LocalAiMessage {
                role: "system".to_string(),
                content: Value::String(system_prompt.to_string()),
            },
            LocalAiMessage {
                role: "user".to_string(),
                content: json!([
                    { "type": "text", "text": user_prompt },
                    {
                        "type": "image_url",
                        "image_url": { "url": image.as_data_url() },
                    },
                ]),
            },
        ];

        let request_body = LocalAiRequest {
            messages,
            model: self.model.as_deref(),
            temperature: 0.0,
            max_tokens: 1500,
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(FacadeError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FacadeError::AiApi(error_text));
        }

        let local_ai_response: LocalAiResponse = response
            .json()
            .await
            .map_err(FacadeError::AiDeserialization)?;

        let raw_response = local_ai_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(raw_response)
    }
}

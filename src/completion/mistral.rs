use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{provider_role, ChatCompletion, CompletionConfig, CompletionError};
use crate::models::chat::Conversation;

const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const DEFAULT_MODEL: &str = "mistral-small-latest";

pub struct MistralClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct MistralMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct MistralChatRequest {
    model: String,
    messages: Vec<MistralMessage>,
}

#[derive(Deserialize)]
struct MistralResponse {
    #[serde(default)]
    choices: Vec<MistralChoice>,
}

#[derive(Deserialize)]
struct MistralChoice {
    message: MistralResponseMessage,
}

#[derive(Deserialize)]
struct MistralResponseMessage {
    // Providers may return structured content blocks; anything but a plain
    // string is rejected.
    content: JsonValue,
}

impl MistralClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| CompletionError::InvalidConfig(format!("invalid API key: {}", e)))?,
        );

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| CompletionError::InvalidConfig("Mistral API key is required".into()))?;
        Self::new(api_key, config.model.clone(), config.base_url.clone())
    }
}

#[async_trait]
impl ChatCompletion for MistralClient {
    async fn generate_response(
        &self,
        conversation: &Conversation,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let mut messages: Vec<MistralMessage> = conversation
            .messages
            .iter()
            .map(|message| MistralMessage {
                role: provider_role(message.sender).to_string(),
                content: message.content.clone(),
            })
            .collect();
        messages.push(MistralMessage {
            role: "user".to_string(),
            content: user_message.to_string(),
        });

        let request = MistralChatRequest {
            model: self.model.clone(),
            messages,
        };

        let response = self
            .http
            .post(self.base_url.trim_end_matches('/'))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<MistralResponse>()
            .await?;

        let choice = response.choices.into_iter().next().ok_or(CompletionError::NoChoices)?;

        match choice.message.content {
            JsonValue::String(text) => Ok(text),
            _ => Err(CompletionError::NotText),
        }
    }
}

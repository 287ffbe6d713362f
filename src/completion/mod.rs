pub mod local;
pub mod mistral;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::cli::Args;
use crate::models::chat::{Conversation, Sender};

/// Errors from the completion boundary. All are fatal for the current send;
/// there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("No choices returned in chat response")]
    NoChoices,
    #[error("API did not return a string")]
    NotText,
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid completion configuration: {0}")]
    InvalidConfig(String),
}

/// Completion boundary: given the prior conversation and a new user
/// utterance, produce the next bot utterance.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn generate_response(
        &self,
        conversation: &Conversation,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderType {
    Mistral,
    Local,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseProviderTypeError {
    message: String,
}

impl fmt::Display for ParseProviderTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ParseProviderTypeError {}

impl FromStr for ProviderType {
    type Err = ParseProviderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mistral" => Ok(ProviderType::Mistral),
            "local" => Ok(ProviderType::Local),
            _ => Err(ParseProviderTypeError {
                message: format!("Invalid completion provider type: '{}'", s),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub provider: ProviderType,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl CompletionConfig {
    pub fn from_args(args: &Args) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self {
            provider: args.completion_type.parse()?,
            api_key: Some(args.completion_api_key.clone()).filter(|k| !k.is_empty()),
            model: args.completion_model.clone(),
            base_url: args.completion_base_url.clone(),
        })
    }
}

/// Role string sent to the provider for each stored message.
pub(crate) fn provider_role(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Bot => "assistant",
    }
}

pub fn new_client(
    config: &CompletionConfig,
) -> Result<Arc<dyn ChatCompletion>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatCompletion> = match config.provider {
        ProviderType::Mistral => Arc::new(mistral::MistralClient::from_config(config)?),
        ProviderType::Local => Arc::new(local::LocalResponder::new()),
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_type_parses_case_insensitively() {
        assert_eq!("Mistral".parse::<ProviderType>(), Ok(ProviderType::Mistral));
        assert_eq!("LOCAL".parse::<ProviderType>(), Ok(ProviderType::Local));
        assert!("openai".parse::<ProviderType>().is_err());
    }

    #[test]
    fn roles_map_to_provider_vocabulary() {
        assert_eq!(provider_role(Sender::User), "user");
        assert_eq!(provider_role(Sender::Bot), "assistant");
    }
}

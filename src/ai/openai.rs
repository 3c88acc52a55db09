//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::github::IntakeError;

use super::transcript::Message;

/// Default chat-completions API base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Sends a transcript to a chat model and returns the reply text.
#[cfg_attr(test, mockall::automock)]
pub trait ChatCompletionService {
    /// Sends the full ordered transcript and returns the first choice's
    /// content unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] when the request fails or the response has no
    /// assistant content.
    fn complete(&self, messages: &[Message]) -> Result<String, IntakeError>;
}

/// Configuration for [`OpenAiChatService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiChatConfig {
    /// Base API URL (e.g., `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
    /// HTTP timeout. `None` waits for the model indefinitely.
    pub timeout: Option<Duration>,
}

impl OpenAiChatConfig {
    /// Constructs configuration with no request timeout.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout: None,
        }
    }

    /// Sets a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Chat service speaking the OpenAI chat-completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiChatService {
    config: OpenAiChatConfig,
}

impl OpenAiChatService {
    /// Creates a service from explicit configuration.
    #[must_use]
    pub const fn new(config: OpenAiChatConfig) -> Self {
        Self { config }
    }

    /// Model identifier this service sends.
    #[must_use]
    pub const fn model(&self) -> &str {
        self.config.model.as_str()
    }

    fn extract_api_key(&self) -> Result<&str, IntakeError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(IntakeError::MissingApiKey)
    }

    fn create_http_client(&self) -> Result<Client, IntakeError> {
        Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|error| IntakeError::Configuration {
                message: format!("failed to configure chat HTTP client: {error}"),
            })
    }
}

impl ChatCompletionService for OpenAiChatService {
    fn complete(&self, messages: &[Message]) -> Result<String, IntakeError> {
        let api_key = self.extract_api_key()?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatCompletionsRequest {
            model: self.config.model.as_str(),
            messages,
        };
        tracing::debug!(
            %endpoint,
            model = self.model(),
            messages = messages.len(),
            "sending chat completion request"
        );

        let client = self.create_http_client()?;
        let response = client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .map_err(|error| IntakeError::Network {
                message: format!("chat request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            tracing::warn!(%status, "chat completion request failed");
            let body = response.text().map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), 160),
            );
            return Err(IntakeError::Api {
                message: format!("chat request failed with status {}: {body}", status.as_u16()),
            });
        }

        let response_payload: ChatCompletionsResponse =
            response.json().map_err(|error| IntakeError::Decode {
                what: "chat completion response",
                message: error.to_string(),
            })?;

        response_payload
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .and_then(parse_content_value)
            .map(ToOwned::to_owned)
            .ok_or_else(|| IntakeError::Decode {
                what: "chat completion response",
                message: "no choice carried assistant content".to_owned(),
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<ChatContent>,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;

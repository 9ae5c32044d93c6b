use crate::apis::api_client::{check_status, resolve_model, ApiClient, BackendKind, Message};
use crate::errors::AppError;
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

// Anthropic API models
#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContent {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },

    // tool_use, thinking and anything newer
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

pub struct AnthropicClient {
    api_key: String,
    model: String,
    api_base: String,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn with_api_key(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key,
            model: resolve_model(model, BackendKind::Anthropic),
            api_base: ANTHROPIC_MESSAGES_URL.to_string(),
            timeout,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_client(&self) -> Result<BlockingClient, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| AppError::ConfigError(format!("Invalid API key: {}", e)))?,
        );

        Ok(BlockingClient::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?)
    }

    fn extract_system_message(messages: &[Message]) -> String {
        messages
            .iter()
            .find(|msg| msg.role == "system")
            .map(|msg| msg.content.clone())
            .unwrap_or_default()
    }

    fn convert_messages(messages: Vec<Message>) -> Vec<AnthropicMessage> {
        messages
            .into_iter()
            .filter(|msg| msg.role != "system") // system goes in its own field
            .map(|msg| AnthropicMessage {
                role: msg.role,
                content: msg.content,
            })
            .collect()
    }
}

impl ApiClient for AnthropicClient {
    fn complete(&self, messages: Vec<Message>) -> Result<String, AppError> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: 0.3,
            system: Self::extract_system_message(&messages),
            messages: Self::convert_messages(messages),
        };

        let response = self
            .build_client()?
            .post(&self.api_base)
            .json(&request)
            .send()?;
        let response = check_status(response)?;

        let response_text = response
            .text()
            .map_err(|e| AppError::NetworkError(format!("Failed to get response text: {}", e)))?;
        let anthropic_response: AnthropicResponse = serde_json::from_str(&response_text)?;

        Ok(anthropic_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContent::Text { text } => Some(text),
                AnthropicContent::Other => None,
            })
            .collect::<String>())
    }
}

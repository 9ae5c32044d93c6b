use crate::apis::api_client::{check_status, resolve_model, ApiClient, BackendKind, Message};
use crate::errors::AppError;
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// Chat Completions API types, shared by OpenAI and OpenRouter
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any Chat Completions endpoint with bearer-token auth
pub struct OpenAIClient {
    api_key: String,
    model: String,
    api_base: String,
    temperature: Option<f32>,
    timeout: Duration,
}

impl OpenAIClient {
    /// api.openai.com, `temperature: 0.3`
    pub fn with_api_key(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key,
            model: resolve_model(model, BackendKind::OpenAi),
            api_base: OPENAI_CHAT_URL.to_string(),
            temperature: Some(0.3),
            timeout,
        }
    }

    /// openrouter.ai, provider-default temperature
    pub fn openrouter(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key,
            model: resolve_model(model, BackendKind::OpenRouter),
            api_base: OPENROUTER_CHAT_URL.to_string(),
            temperature: None,
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
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| AppError::ConfigError(format!("Invalid API key: {}", e)))?,
        );

        Ok(BlockingClient::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?)
    }
}

impl ApiClient for OpenAIClient {
    fn complete(&self, messages: Vec<Message>) -> Result<String, AppError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
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
        let chat_response: ChatResponse = serde_json::from_str(&response_text)?;

        // Extract content from the first choice
        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

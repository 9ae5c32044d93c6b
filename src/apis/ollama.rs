use crate::apis::api_client::{check_status, resolve_model, ApiClient, BackendKind, Message};
use crate::errors::AppError;
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OLLAMA_CHAT_URL: &str = "http://localhost:11434/api/chat";

// Ollama API Types
#[derive(Debug, Clone, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Debug, Default, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    message: OllamaMessage,
}

#[derive(Debug, Default, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

/// Local Ollama server, no authentication
pub struct OllamaClient {
    model: String,
    api_base: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(model: Option<String>, timeout: Duration) -> Self {
        Self {
            model: resolve_model(model, BackendKind::Ollama),
            api_base: OLLAMA_CHAT_URL.to_string(),
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
}

impl ApiClient for OllamaClient {
    fn complete(&self, messages: Vec<Message>) -> Result<String, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = BlockingClient::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let request = OllamaRequest {
            model: self.model.clone(),
            messages,
            stream: false,
        };

        let response = client
            .post(&self.api_base)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    // Connection failed - likely Ollama is not running
                    AppError::NetworkError(
                        "Failed to connect to Ollama server. Make sure 'ollama serve' is running."
                            .to_string(),
                    )
                } else {
                    AppError::NetworkError(e.to_string())
                }
            })?;
        let response = check_status(response)?;

        let response_text = response
            .text()
            .map_err(|e| AppError::NetworkError(format!("Failed to get response text: {}", e)))?;
        let ollama_response: OllamaResponse = serde_json::from_str(&response_text)?;

        // Ollama returns a single message
        Ok(ollama_response.message.content)
    }
}

//! Formats one agent request, sends it to the chosen backend and returns text.
//!
//! `run` never fails: missing keys, provider error statuses and transport
//! failures all come back as a bracketed, displayable string.

use crate::apis::anthropic::{AnthropicClient, ANTHROPIC_MESSAGES_URL};
use crate::apis::ollama::{OllamaClient, OLLAMA_CHAT_URL};
use crate::apis::openai::{OpenAIClient, OPENAI_CHAT_URL, OPENROUTER_CHAT_URL};
use crate::apis::{ApiClient, BackendKind, Message};
use crate::config::{Config, DEFAULT_TIMEOUT_SECS};
use crate::errors::AppError;
use crate::secrets::SecretResolver;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const ECHO_PREFIX: &str = "[Echo Backend]\n";
const ERROR_BODY_LIMIT: usize = 500;

/// Full request URLs per provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub openrouter: String,
    pub ollama: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: OPENAI_CHAT_URL.to_string(),
            anthropic: ANTHROPIC_MESSAGES_URL.to_string(),
            openrouter: OPENROUTER_CHAT_URL.to_string(),
            ollama: OLLAMA_CHAT_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every provider path mounted under one base URL (a proxy or a mock server)
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            openai: format!("{}/v1/chat/completions", base),
            anthropic: format!("{}/v1/messages", base),
            openrouter: format!("{}/api/v1/chat/completions", base),
            ollama: format!("{}/api/chat", base),
        }
    }
}

pub struct Dispatcher {
    secrets: SecretResolver,
    endpoints: Endpoints,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(secrets: SecretResolver) -> Self {
        Self {
            secrets,
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Standard secret chain, configured timeout and Ollama host
    pub fn from_config(config: &Config) -> Self {
        let endpoints = Endpoints {
            ollama: format!("{}/api/chat", config.ollama_base_url.trim_end_matches('/')),
            ..Endpoints::default()
        };
        Self::new(SecretResolver::standard(&config.secrets_path))
            .with_endpoints(endpoints)
            .with_timeout(config.request_timeout)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn secrets(&self) -> &SecretResolver {
        &self.secrets
    }

    /// Run against a JSON context (or none)
    pub fn run(
        &self,
        backend: &str,
        model: &str,
        system_prompt: &str,
        user_input: &str,
        context: Option<&Value>,
    ) -> String {
        self.run_with_context(backend, model, system_prompt, user_input, context)
    }

    /// Run with any serializable context; a context that fails to serialize is
    /// replaced by an `(unserializable)` marker instead of failing the call
    pub fn run_with_context<C>(
        &self,
        backend: &str,
        model: &str,
        system_prompt: &str,
        user_input: &str,
        context: Option<&C>,
    ) -> String
    where
        C: Serialize + ?Sized,
    {
        let kind = BackendKind::parse(backend);
        let user_content = format!("{}{}", user_input, format_context(context));

        match self.dispatch(kind, model, system_prompt, user_content) {
            Ok(text) => text,
            Err(err) => render_error(kind, &err),
        }
    }

    fn dispatch(
        &self,
        kind: BackendKind,
        model: &str,
        system_prompt: &str,
        user_content: String,
    ) -> Result<String, AppError> {
        let model = Some(model.trim().to_string()).filter(|m| !m.is_empty());
        let messages = || {
            vec![
                Message::system(system_prompt.to_string()),
                Message::user(user_content.clone()),
            ]
        };

        match kind {
            BackendKind::OpenAi => {
                let key = self.api_key(kind)?;
                OpenAIClient::with_api_key(key, model, self.timeout)
                    .with_api_base(&self.endpoints.openai)
                    .complete(messages())
            }
            BackendKind::Anthropic => {
                let key = self.api_key(kind)?;
                AnthropicClient::with_api_key(key, model, self.timeout)
                    .with_api_base(&self.endpoints.anthropic)
                    .complete(messages())
            }
            BackendKind::OpenRouter => {
                let key = self.api_key(kind)?;
                OpenAIClient::openrouter(key, model, self.timeout)
                    .with_api_base(&self.endpoints.openrouter)
                    .complete(messages())
            }
            BackendKind::Ollama => OllamaClient::new(model, self.timeout)
                .with_api_base(&self.endpoints.ollama)
                .complete(messages()),
            // system prompt is ignored
            BackendKind::Echo => Ok(format!("{}{}", ECHO_PREFIX, user_content)),
        }
    }

    fn api_key(&self, kind: BackendKind) -> Result<String, AppError> {
        let name = kind.api_key_name().unwrap_or_default();
        self.secrets
            .resolve(name)
            .ok_or_else(|| AppError::MissingApiKey(name.to_string()))
    }
}

/// The `CONTEXT (JSON)` block appended to the user input; empty when there is
/// no context or it serializes to null / an empty object or array
pub fn format_context<C>(context: Option<&C>) -> String
where
    C: Serialize + ?Sized,
{
    let Some(context) = context else {
        return String::new();
    };

    let value = match serde_json::to_value(context) {
        Ok(value) => value,
        Err(_) => return "\n\nCONTEXT: (unserializable)".to_string(),
    };

    let is_empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if is_empty {
        return String::new();
    }

    match serde_json::to_string_pretty(&value) {
        Ok(json) => format!("\n\nCONTEXT (JSON):\n{}", json),
        Err(_) => "\n\nCONTEXT: (unserializable)".to_string(),
    }
}

/// Bracketed error string shown in place of a completion
pub fn render_error(kind: BackendKind, err: &AppError) -> String {
    match err {
        AppError::MissingApiKey(name) => format!("[Error] {} not set.", name),
        AppError::ApiError { status, body } => format!(
            "[{} Error] {}: {}",
            kind.label(),
            status,
            truncate_chars(body, ERROR_BODY_LIMIT)
        ),
        AppError::NetworkError(msg) => format!("[{} Error] request failed: {}", kind.label(), msg),
        AppError::ParseError(msg) => format!("[{} Error] invalid response: {}", kind.label(), msg),
        AppError::ConfigError(msg) => format!("[{} Error] {}", kind.label(), msg),
    }
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

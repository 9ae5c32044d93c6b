use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: String) -> Self {
        Self {
            role: "system".to_string(),
            content,
        }
    }

    pub fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// One-shot, blocking completion against a single provider
pub trait ApiClient {
    /// Send `messages` and return the assistant text from the response envelope
    fn complete(&self, messages: Vec<Message>) -> Result<String, AppError>;
}

/// The closed set of providers an agent can target.
///
/// Anything that does not name a provider parses to `Echo`, the offline
/// fallback that needs no configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    OpenAi,
    Anthropic,
    OpenRouter,
    Ollama,
    Echo,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        BackendKind::OpenAi,
        BackendKind::Anthropic,
        BackendKind::OpenRouter,
        BackendKind::Ollama,
        BackendKind::Echo,
    ];

    /// Case-insensitive, whitespace-tolerant parse
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "openai" => BackendKind::OpenAi,
            "anthropic" => BackendKind::Anthropic,
            "openrouter" => BackendKind::OpenRouter,
            "ollama" => BackendKind::Ollama,
            _ => BackendKind::Echo,
        }
    }

    /// Identifier persisted in the `agents.backend` column
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "openai",
            BackendKind::Anthropic => "anthropic",
            BackendKind::OpenRouter => "openrouter",
            BackendKind::Ollama => "ollama",
            BackendKind::Echo => "echo",
        }
    }

    /// Display name used in `[<Label> Error]` strings
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "OpenAI",
            BackendKind::Anthropic => "Anthropic",
            BackendKind::OpenRouter => "OpenRouter",
            BackendKind::Ollama => "Ollama",
            BackendKind::Echo => "Echo",
        }
    }

    pub fn api_key_name(&self) -> Option<&'static str> {
        match self {
            BackendKind::OpenAi => Some("OPENAI_API_KEY"),
            BackendKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            BackendKind::OpenRouter => Some("OPENROUTER_API_KEY"),
            BackendKind::Ollama | BackendKind::Echo => None,
        }
    }

    /// Model used when the agent leaves its model blank
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            BackendKind::OpenAi => Some("gpt-4o-mini"),
            BackendKind::Anthropic => Some("claude-3-5-sonnet-latest"),
            BackendKind::OpenRouter => Some("openai/gpt-4o-mini"),
            BackendKind::Ollama => Some("llama3.1"),
            BackendKind::Echo => None,
        }
    }

    /// Next entry in `ALL`, wrapping around; drives the backend picker
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the caller's model unless it is blank
pub(crate) fn resolve_model(model: Option<String>, kind: BackendKind) -> String {
    match model {
        Some(m) if !m.trim().is_empty() => m.trim().to_string(),
        _ => kind.default_model().unwrap_or_default().to_string(),
    }
}

/// Turn a non-success response into `AppError::ApiError`, keeping the raw body
pub(crate) fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AppError::ApiError {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_forgiving() {
        assert_eq!(BackendKind::parse(" OpenAI "), BackendKind::OpenAi);
        assert_eq!(BackendKind::parse("ANTHROPIC"), BackendKind::Anthropic);
        assert_eq!(BackendKind::parse("openrouter"), BackendKind::OpenRouter);
        assert_eq!(BackendKind::parse("ollama"), BackendKind::Ollama);
        assert_eq!(BackendKind::parse("echo"), BackendKind::Echo);
        assert_eq!(BackendKind::parse(""), BackendKind::Echo);
        assert_eq!(BackendKind::parse("gemini"), BackendKind::Echo);
    }

    #[test]
    fn test_round_trip_through_storage_string() {
        for kind in BackendKind::ALL {
            assert_eq!(BackendKind::parse(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_picker_cycles() {
        assert_eq!(BackendKind::Echo.next(), BackendKind::OpenAi);
        assert_eq!(BackendKind::OpenAi.previous(), BackendKind::Echo);
    }

    #[test]
    fn test_resolve_model() {
        assert_eq!(resolve_model(None, BackendKind::Ollama), "llama3.1");
        assert_eq!(
            resolve_model(Some("  ".to_string()), BackendKind::OpenRouter),
            "openai/gpt-4o-mini"
        );
        assert_eq!(
            resolve_model(Some(" gpt-4o ".to_string()), BackendKind::OpenAi),
            "gpt-4o"
        );
    }
}

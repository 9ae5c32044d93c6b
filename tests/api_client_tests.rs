//! Unit tests for the provider clients

use mockito::Server;
use std::time::Duration;
use strategy_planner::apis::anthropic::AnthropicClient;
use strategy_planner::apis::ollama::OllamaClient;
use strategy_planner::apis::openai::OpenAIClient;
use strategy_planner::apis::{ApiClient, BackendKind, Message};
use strategy_planner::errors::AppError;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Tests for the Message struct
#[test]
fn test_message_creation() {
    let system_msg = Message::system("Test system message".to_string());
    assert_eq!(system_msg.role, "system");
    assert_eq!(system_msg.content, "Test system message");

    let user_msg = Message::user("Test user message".to_string());
    assert_eq!(user_msg.role, "user");
    assert_eq!(user_msg.content, "Test user message");
}

#[test]
fn test_default_models() {
    let openai = OpenAIClient::with_api_key("test_api_key".to_string(), None, TIMEOUT);
    assert_eq!(openai.model(), "gpt-4o-mini");

    let openrouter = OpenAIClient::openrouter("test_api_key".to_string(), None, TIMEOUT);
    assert_eq!(openrouter.model(), "openai/gpt-4o-mini");

    let anthropic = AnthropicClient::with_api_key("test_api_key".to_string(), None, TIMEOUT);
    assert_eq!(anthropic.model(), "claude-3-5-sonnet-latest");

    let ollama = OllamaClient::new(Some(String::new()), TIMEOUT);
    assert_eq!(ollama.model(), "llama3.1");
}

#[test]
fn test_custom_model_is_kept() {
    let client = OpenAIClient::with_api_key(
        "test_api_key".to_string(),
        Some("gpt-4-turbo".to_string()),
        TIMEOUT,
    );
    assert_eq!(client.model(), "gpt-4-turbo");
}

#[test]
fn test_backend_kind_labels() {
    let labels: Vec<&str> = BackendKind::ALL.iter().map(|k| k.label()).collect();
    assert_eq!(labels, vec!["OpenAI", "Anthropic", "OpenRouter", "Ollama", "Echo"]);
    assert_eq!(BackendKind::default(), BackendKind::OpenAi);
    assert_eq!(BackendKind::parse("OLLAMA"), BackendKind::Ollama);
    assert_eq!(BackendKind::Anthropic.to_string(), "anthropic");
}

#[test]
fn test_error_status_keeps_body() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(r#"{"error":{"type":"authentication_error"}}"#)
        .create();

    let client = AnthropicClient::with_api_key("bad".to_string(), None, TIMEOUT)
        .with_api_base(format!("{}/v1/messages", server.url()));
    let err = client
        .complete(vec![Message::user("hi".to_string())])
        .unwrap_err();

    match err {
        AppError::ApiError { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("authentication_error"));
        }
        other => panic!("expected ApiError, got {other}"),
    }
}

#[test]
fn test_malformed_body_is_parse_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create();

    let client = OpenAIClient::with_api_key("key".to_string(), None, TIMEOUT)
        .with_api_base(format!("{}/v1/chat/completions", server.url()));
    let err = client
        .complete(vec![Message::user("hi".to_string())])
        .unwrap_err();
    assert!(matches!(err, AppError::ParseError(_)));
}

pub mod anthropic;
pub mod api_client;
pub mod ollama;
pub mod openai;

pub use api_client::{ApiClient, BackendKind, Message};

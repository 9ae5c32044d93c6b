use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Transport failure before a status line arrived (timeout, DNS, TLS, refused)
    NetworkError(String),
    /// Provider answered with a non-success status
    ApiError {
        status: u16,
        body: String,
    },
    /// Success status but the body was not the expected JSON envelope
    ParseError(String),
    /// Named credential missing from every secret source
    MissingApiKey(String),
    ConfigError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::ApiError { status, body } => write!(f, "API Error {}: {}", status, body),
            AppError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
            AppError::MissingApiKey(name) => write!(f, "{} not set.", name),
            AppError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

use crate::apis::api_client::BackendKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two persisted tables a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Canvas,
    Agent,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Canvas => write!(f, "canvas"),
            RecordKind::Agent => write!(f, "agent"),
        }
    }
}

/// A saved Value Proposition Canvas.
///
/// Field order matches the column order of the `canvases` table, which is also
/// the key order of the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: i64,
    pub name: String,
    pub customer_jobs: String,
    pub pains: String,
    pub gains: String,
    pub products_services: String,
    pub gain_creators: String,
    pub pain_relievers: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Input to `Store::save_canvas`. `id: None` inserts, `Some` updates in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasDraft {
    pub id: Option<i64>,
    pub name: String,
    pub customer_jobs: String,
    pub pains: String,
    pub gains: String,
    pub products_services: String,
    pub gain_creators: String,
    pub pain_relievers: String,
}

impl CanvasDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl From<&Canvas> for CanvasDraft {
    fn from(canvas: &Canvas) -> Self {
        Self {
            id: Some(canvas.id),
            name: canvas.name.clone(),
            customer_jobs: canvas.customer_jobs.clone(),
            pains: canvas.pains.clone(),
            gains: canvas.gains.clone(),
            products_services: canvas.products_services.clone(),
            gain_creators: canvas.gain_creators.clone(),
            pain_relievers: canvas.pain_relievers.clone(),
        }
    }
}

/// A saved LLM invocation preset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub function: String,
    pub prompt: String,
    pub backend: String,
    pub model: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Agent {
    /// Parse the stored backend string; unknown values fall back to echo
    pub fn backend_kind(&self) -> BackendKind {
        BackendKind::parse(&self.backend)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDraft {
    pub id: Option<i64>,
    pub name: String,
    pub function: String,
    pub prompt: String,
    pub backend: String,
    pub model: String,
}

impl AgentDraft {
    pub fn named(name: impl Into<String>, backend: BackendKind) -> Self {
        Self {
            name: name.into(),
            backend: backend.as_str().to_string(),
            ..Default::default()
        }
    }
}

/// Row returned by the list operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: i64,
    pub name: String,
    pub updated_at: String,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: i64,
    pub name: String,
    pub updated_at: String,
}

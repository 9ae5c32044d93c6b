//! API key lookup.
//!
//! Keys are resolved through an ordered list of providers: the secrets file
//! first, then the process environment. The first non-empty value wins.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A single source of named secrets
pub trait SecretProvider {
    /// Short name shown in the log view
    fn source(&self) -> &str;

    /// Value for `key`; empty strings are treated as absent
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads `KEY=value` pairs from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl SecretProvider for EnvSecrets {
    fn source(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// A JSON object of secrets on disk, e.g. `{"OPENAI_API_KEY": "sk-..."}`.
///
/// A missing or malformed file simply contributes no values.
#[derive(Debug, Clone)]
pub struct FileSecrets {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSecrets {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<serde_json::Map<String, Value>>(&text).ok())
            .map(|map| {
                map.into_iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k, s)),
                        Value::Number(n) => Some((k, n.to_string())),
                        Value::Bool(b) => Some((k, b.to_string())),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SecretProvider for FileSecrets {
    fn source(&self) -> &str {
        "secrets file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Fixed in-memory secrets
#[derive(Debug, Default, Clone)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretProvider for StaticSecrets {
    fn source(&self) -> &str {
        "static"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Ordered chain of providers
#[derive(Default)]
pub struct SecretResolver {
    providers: Vec<Box<dyn SecretProvider>>,
}

impl SecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Secrets file, then environment
    pub fn standard(secrets_path: impl AsRef<Path>) -> Self {
        Self::new()
            .with_provider(FileSecrets::load(secrets_path))
            .with_provider(EnvSecrets)
    }

    pub fn with_provider(mut self, provider: impl SecretProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn resolve(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|p| p.get(key))
    }

    /// Name of the first provider holding `key`
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.providers
            .iter()
            .find(|p| p.get(key).is_some())
            .map(|p| p.source())
    }

    pub fn sources(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.source()).collect()
    }
}

//! Runtime configuration, read once at startup

use crate::errors::AppError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Holds the database, secrets file and logs unless overridden
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub secrets_path: PathBuf,
    pub log_dir: PathBuf,
    /// Where canvas exports and saved agent outputs are written
    pub export_dir: PathBuf,
    pub request_timeout: Duration,
    pub ollama_base_url: String,
}

impl Config {
    /// All paths rooted at `data_dir`, everything else at its default
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            db_path: data_dir.join("strategy.db"),
            secrets_path: data_dir.join("secrets.json"),
            log_dir: data_dir.join("logs"),
            export_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            data_dir,
        }
    }

    /// Load `.env` if present, then apply `STRATEGY_PLANNER_*` overrides
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = match get("STRATEGY_PLANNER_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| {
                    AppError::ConfigError(
                        "Could not determine home directory; set STRATEGY_PLANNER_HOME".to_string(),
                    )
                })?
                .join(".strategy-planner"),
        };

        let mut config = Self::with_data_dir(data_dir);

        if let Some(db) = get("STRATEGY_PLANNER_DB") {
            config.db_path = PathBuf::from(db);
        }
        if let Some(dir) = get("STRATEGY_PLANNER_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get("STRATEGY_PLANNER_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "STRATEGY_PLANNER_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            if secs == 0 {
                return Err(AppError::ConfigError(
                    "STRATEGY_PLANNER_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(url) = get("OLLAMA_BASE_URL") {
            config.ollama_base_url = url.trim().trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_paths_follow_home() {
        let config =
            Config::from_lookup(lookup_from(&[("STRATEGY_PLANNER_HOME", "/tmp/sp")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/sp/strategy.db"));
        assert_eq!(config.secrets_path, PathBuf::from("/tmp/sp/secrets.json"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/sp/logs"));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("STRATEGY_PLANNER_HOME", "/tmp/sp"),
            ("STRATEGY_PLANNER_DB", "/data/other.db"),
            ("STRATEGY_PLANNER_EXPORT_DIR", "/tmp/out"),
            ("STRATEGY_PLANNER_TIMEOUT_SECS", "15"),
            ("OLLAMA_BASE_URL", "http://gpu-box:11434/"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/other.db"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("STRATEGY_PLANNER_HOME", "/tmp/sp"),
            ("STRATEGY_PLANNER_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let result = Config::from_lookup(lookup_from(&[
            ("STRATEGY_PLANNER_HOME", "/tmp/sp"),
            ("STRATEGY_PLANNER_TIMEOUT_SECS", "0"),
        ]));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}

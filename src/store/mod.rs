//! SQLite persistence for canvases and agents
//!
//! Every operation opens its own connection and closes it on return; writes
//! run inside a single transaction. There is no pooling and no cross-operation
//! transaction, so two writers racing on the same row resolve at SQLite's
//! default isolation.

mod agent;
mod canvas;
pub mod error;
pub mod export;
mod schema;

pub use error::{StoreError, StoreResult};

use crate::models::RecordKind;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Handle on the strategy database file
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open (creating if needed) the database at `path` and ensure both tables exist
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let store = Self { path };
        let conn = store.connect()?;
        schema::apply(&conn)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

/// Current UTC time as ISO-8601 with second precision
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn validate_name(name: &str, kind: RecordKind) -> StoreResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName(kind));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = now_timestamp();
        // 2024-01-02T03:04:05
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "T");
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S").is_ok());
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Field Techs ", RecordKind::Canvas).unwrap(), "Field Techs");
        assert!(matches!(
            validate_name("   ", RecordKind::Agent),
            Err(StoreError::EmptyName(RecordKind::Agent))
        ));
    }
}

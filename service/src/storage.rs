use crate::models::LogMeta;
use matchlog::{MatchReport, ParsedEvent};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Log not found: {0}")]
    NotFound(String),
}

/// One directory per parsed log: `meta.json`, `report.json`, `events.mp`.
pub struct LogStorage {
    base_path: PathBuf,
}

impl LogStorage {
    pub fn new(base_path: impl AsRef<Path>) -> std::io::Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn create_log(&self) -> std::io::Result<String> {
        let log_id = Uuid::new_v4().to_string();
        fs::create_dir_all(self.log_path(&log_id))?;
        Ok(log_id)
    }

    pub fn log_path(&self, log_id: &str) -> PathBuf {
        self.base_path.join(log_id)
    }

    fn existing_log_path(&self, log_id: &str) -> Result<PathBuf, StorageError> {
        // Ids are generated UUIDs; anything else must not reach the filesystem.
        if Uuid::parse_str(log_id).is_err() {
            return Err(StorageError::NotFound(log_id.to_string()));
        }
        let path = self.log_path(log_id);
        if !path.is_dir() {
            return Err(StorageError::NotFound(log_id.to_string()));
        }
        Ok(path)
    }

    pub fn delete_log(&self, log_id: &str) -> Result<(), StorageError> {
        let path = self.existing_log_path(log_id)?;
        fs::remove_dir_all(path)?;
        Ok(())
    }

    pub fn write_log(&self, meta: &LogMeta, report: &MatchReport) -> Result<(), StorageError> {
        let path = self.log_path(&meta.log_id);

        fs::write(path.join("meta.json"), serde_json::to_vec_pretty(meta)?)?;
        fs::write(path.join("report.json"), report.to_json().map_err(to_json_error)?)?;
        // Named encoding: tagged event enums need a self-describing layout.
        fs::write(path.join("events.mp"), rmp_serde::to_vec_named(&report.events)?)?;

        Ok(())
    }

    /// Writes a freshly created log, removing its directory if any file fails.
    pub fn commit_log(&self, meta: &LogMeta, report: &MatchReport) -> Result<(), StorageError> {
        let result = self.write_log(meta, report);
        if result.is_err() {
            if let Err(e) = fs::remove_dir_all(self.log_path(&meta.log_id)) {
                warn!("Failed to clean up log {}: {}", meta.log_id, e);
            }
        }
        result
    }

    pub fn read_meta(&self, log_id: &str) -> Result<LogMeta, StorageError> {
        let path = self.existing_log_path(log_id)?.join("meta.json");
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }

    pub fn read_report(&self, log_id: &str) -> Result<MatchReport, StorageError> {
        let path = self.existing_log_path(log_id)?.join("report.json");
        let json = fs::read_to_string(path)?;
        MatchReport::from_json(&json).map_err(to_json_error)
    }

    pub fn read_events(&self, log_id: &str) -> Result<Vec<ParsedEvent>, StorageError> {
        let path = self.existing_log_path(log_id)?.join("events.mp");
        Ok(rmp_serde::from_slice(&fs::read(path)?)?)
    }
}

fn to_json_error(e: matchlog::ParseError) -> StorageError {
    match e {
        matchlog::ParseError::Json(e) => StorageError::Json(e),
        other => StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, other.to_string())),
    }
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::errors::StoreError;
use crate::models::{Week, WeeksDocument};

pub const DEFAULT_DATA_FILE: &str = "_data/weeks.yml";

/// YAML-backed storage for the weeks document.
///
/// The file is read once at the start of a run and written once at the end.
/// There is no locking; concurrent runs against the same file are unsupported.
#[derive(Debug, Clone)]
pub struct WeeksStore {
    path: PathBuf,
}

impl WeeksStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the data file.
    pub async fn load(&self) -> Result<WeeksDocument, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()))
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let doc = parse_document(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if let Some(number) = doc.duplicate_week() {
            return Err(StoreError::DuplicateWeek(number));
        }

        tracing::debug!(
            path = %self.path.display(),
            weeks = doc.weeks.len(),
            version = ?doc.version,
            "Weeks document loaded"
        );
        Ok(doc)
    }

    /// Stamp a new `version` and overwrite the data file with `doc`.
    /// Returns the version written.
    pub async fn save(&self, doc: &mut WeeksDocument) -> Result<i64, StoreError> {
        let version = stamp_version(doc, Utc::now().timestamp());
        let content = serde_yaml::to_string(doc).map_err(StoreError::Serialize)?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(path = %self.path.display(), version, "Weeks document saved");
        Ok(version)
    }
}

/// An empty file is treated as an empty document.
fn parse_document(content: &str) -> Result<WeeksDocument, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(WeeksDocument::default());
    }
    serde_yaml::from_str(content)
}

/// Set `doc.version` to `now`, or one past the previous version if the clock
/// has not moved on, so versions strictly increase. Saturates at `i64::MAX`.
pub fn stamp_version(doc: &mut WeeksDocument, now: i64) -> i64 {
    let version = match doc.version {
        Some(previous) if previous >= now => previous.saturating_add(1),
        _ => now,
    };
    doc.version = Some(version);
    version
}

pub fn current_week(doc: &WeeksDocument) -> Result<&Week, StoreError> {
    doc.current_week().ok_or(StoreError::NoWeeks)
}

pub fn current_week_mut(doc: &mut WeeksDocument) -> Result<&mut Week, StoreError> {
    doc.current_week_mut().ok_or(StoreError::NoWeeks)
}

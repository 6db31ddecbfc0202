//! JSON file adapter: Implementation of SnapshotStore.
//!
//! Persists the raw input snapshot as a single JSON document on local disk.
//! Writes go to a sibling temporary file first and are then renamed over the
//! target, so a crash never leaves a half-written snapshot.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Assessment;
use crate::ports::{SnapshotStore, SNAPSHOT_KEY};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot key mismatch: expected {expected}, found {found}")]
    KeyMismatch { expected: String, found: String },
}

/// On-disk envelope around the assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSnapshot {
    key: String,
    saved_at: DateTime<Utc>,
    assessment: Assessment,
}

/// JSON file storage adapter.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file path.
    ///
    /// The file is not touched until the first save.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store under `dir`, using the fixed snapshot key as file name.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(format!("{SNAPSHOT_KEY}.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    type Error = StorageError;

    fn save(&self, assessment: &Assessment) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let snapshot = StoredSnapshot {
            key: SNAPSHOT_KEY.to_string(),
            saved_at: Utc::now(),
            assessment: assessment.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved input snapshot to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Assessment>, Self::Error> {
        let content = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: StoredSnapshot = serde_json::from_slice(&content)?;
        if snapshot.key != SNAPSHOT_KEY {
            return Err(StorageError::KeyMismatch {
                expected: SNAPSHOT_KEY.to_string(),
                found: snapshot.key,
            });
        }

        tracing::debug!(
            "Loaded input snapshot saved at {}",
            snapshot.saved_at.to_rfc3339()
        );
        Ok(Some(snapshot.assessment))
    }

    fn exists(&self) -> Result<bool, Self::Error> {
        Ok(self.path.try_exists()?)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

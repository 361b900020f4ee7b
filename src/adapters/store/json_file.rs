//! JSON file record store
//!
//! The whole collection lives in one pretty-printed JSON object. Saves go
//! through a temporary file in the target directory which is then renamed
//! over the target, so readers never observe a partially written file.

use crate::adapters::store::traits::RecordStore;
use crate::domain::{PatientCollection, Result, StoreError};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Record store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    create_if_missing: bool,
}

impl JsonFileStore {
    /// Creates a store for `path`; a missing file loads as an empty collection
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_if_missing: true,
        }
    }

    /// Sets whether a missing file is an empty collection (`true`) or an error
    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<PatientCollection> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound && self.create_if_missing => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Record file not found, using an empty collection"
                );
                return Ok(PatientCollection::new());
            }
            Err(e) => {
                return Err(StoreError::ReadFailed {
                    location: self.location(),
                    message: e.to_string(),
                }
                .into())
            }
        };

        if contents.trim().is_empty() {
            return Ok(PatientCollection::new());
        }

        let collection: PatientCollection =
            serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
                location: self.location(),
                message: e.to_string(),
            })?;

        if let Some(problem) = collection.find_invalid() {
            return Err(StoreError::Corrupt {
                location: self.location(),
                message: problem,
            }
            .into());
        }

        tracing::debug!(
            path = %self.path.display(),
            count = collection.len(),
            "Loaded patient records"
        );

        Ok(collection)
    }

    async fn save(&self, collection: &PatientCollection) -> Result<()> {
        let contents =
            serde_json::to_vec_pretty(collection).map_err(|e| StoreError::WriteFailed {
                location: self.location(),
                message: e.to_string(),
            })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(|e| StoreError::WriteFailed {
                location: self.location(),
                message: format!("write task failed: {e}"),
            })??;

        tracing::debug!(
            path = %self.path.display(),
            count = collection.len(),
            "Saved patient records"
        );

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes `contents` to a sibling temporary file, syncs it, then renames it
/// over `path`
fn write_atomically(path: &Path, contents: &[u8]) -> std::result::Result<(), StoreError> {
    let fail = |message: String| StoreError::WriteFailed {
        location: path.display().to_string(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| fail(format!("cannot create directory {}: {e}", dir.display())))?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| fail(e.to_string()))?;
    temp.write_all(contents).map_err(|e| fail(e.to_string()))?;
    temp.as_file().sync_all().map_err(|e| fail(e.to_string()))?;
    temp.persist(path).map_err(|e| fail(e.error.to_string()))?;

    Ok(())
}

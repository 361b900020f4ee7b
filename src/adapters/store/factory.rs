//! Record store factory
//!
//! Builds the configured record store backend.

use crate::adapters::store::json_file::JsonFileStore;
use crate::adapters::store::memory::MemoryStore;
use crate::adapters::store::traits::RecordStore;
use crate::config::schema::{StorageBackend, StorageConfig};
use std::sync::Arc;

/// Create a record store based on the storage configuration
///
/// # Examples
///
/// ```
/// use patient_registry::adapters::store::{create_record_store, RecordStore};
/// use patient_registry::config::StorageConfig;
///
/// let store = create_record_store(&StorageConfig::default());
/// assert_eq!(store.location(), "patients.json");
/// ```
pub fn create_record_store(config: &StorageConfig) -> Arc<dyn RecordStore> {
    match config.backend {
        StorageBackend::JsonFile => {
            tracing::info!(
                path = %config.path,
                create_if_missing = config.create_if_missing,
                "Creating JSON file record store"
            );
            let store = JsonFileStore::new(&config.path)
                .with_create_if_missing(config.create_if_missing);
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Creating in-memory record store; records will not be persisted");
            Arc::new(MemoryStore::new())
        }
    }
}

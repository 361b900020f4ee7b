//! In-memory record store
//!
//! Holds the collection in process memory. Used by tests and by the
//! `memory` storage backend; nothing survives a restart.

use crate::adapters::store::traits::RecordStore;
use crate::domain::{PatientCollection, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Record store that keeps the collection in a lock-protected value
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<PatientCollection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `collection`
    pub fn with_collection(collection: PatientCollection) -> Self {
        Self {
            collection: RwLock::new(collection),
        }
    }

    /// Copy of the currently stored collection
    pub async fn snapshot(&self) -> PatientCollection {
        self.collection.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<PatientCollection> {
        Ok(self.collection.read().await.clone())
    }

    async fn save(&self, collection: &PatientCollection) -> Result<()> {
        *self.collection.write().await = collection.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

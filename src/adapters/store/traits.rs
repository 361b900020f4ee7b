//! Record store abstraction
//!
//! This module defines the trait that record store backends must implement.
//! A store only ever moves the whole collection: there are no per-record
//! reads or writes.

use crate::domain::{PatientCollection, Result};
use async_trait::async_trait;

/// Full-collection load/save contract over persisted patient data
///
/// Implementations provide no locking between `load` and `save`; callers
/// that need read-modify-write atomicity must serialize themselves.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the entire persisted collection
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if the persisted state cannot be read
    /// or does not hold a valid collection.
    async fn load(&self) -> Result<PatientCollection>;

    /// Replace the entire persisted collection
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if the collection cannot be written.
    async fn save(&self, collection: &PatientCollection) -> Result<()>;

    /// Human readable description of where records live (for logs)
    fn location(&self) -> String;
}

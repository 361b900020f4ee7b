//! Patient registry service
//!
//! Every operation performs one full load from the record store, an
//! in-memory change and, for writes, one full save. Writers hold a mutex
//! for their whole load-change-save sequence so that concurrent requests in
//! this process cannot overwrite each other's changes.

use crate::adapters::store::RecordStore;
use crate::core::registry::sort::{sort_views, SortField, SortOrder};
use crate::domain::{
    NewPatient, PatientId, PatientView, RegistryError, Result, UpdatePatient,
};
use serde::ser::{Serialize, Serializer};
use std::sync::Arc;
use tokio::sync::Mutex;

/// All patients with derived fields, in store order
///
/// Serializes as a JSON object keyed by patient id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientListing(pub Vec<(PatientId, PatientView)>);

impl PatientListing {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PatientListing {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(id, view)| (id, view)))
    }
}

/// Registry operations over an injected record store
pub struct PatientRegistry {
    store: Arc<dyn RecordStore>,
    write_lock: Mutex<()>,
}

impl PatientRegistry {
    /// Create a registry over a record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Where the underlying store keeps its records
    pub fn store_location(&self) -> String {
        self.store.location()
    }

    /// List every patient with derived fields
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if the store cannot be loaded.
    pub async fn list(&self) -> Result<PatientListing> {
        let collection = self.store.load().await?;
        let listing = PatientListing(
            collection
                .iter()
                .map(|(id, record)| (id.clone(), record.view()))
                .collect(),
        );

        tracing::debug!(count = listing.len(), "Listed patients");
        Ok(listing)
    }

    /// Fetch one patient with derived fields
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the id is absent.
    pub async fn get(&self, id: &PatientId) -> Result<PatientView> {
        let collection = self.store.load().await?;
        let record = collection
            .get(id)
            .ok_or_else(RegistryError::patient_not_found)?;

        tracing::debug!(patient_id = %id, "Fetched patient");
        Ok(record.view())
    }

    /// All patients ordered by a numeric field
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if the store cannot be loaded.
    pub async fn sort(&self, field: SortField, order: SortOrder) -> Result<Vec<PatientView>> {
        let collection = self.store.load().await?;
        let mut views: Vec<PatientView> = collection.records().map(|r| r.view()).collect();
        sort_views(&mut views, field, order);

        tracing::debug!(
            sort_by = %field,
            order = %order,
            count = views.len(),
            "Sorted patients"
        );
        Ok(views)
    }

    /// Store a new patient
    ///
    /// The payload is validated before the store is touched; on any error
    /// the store is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` for constraint violations and
    /// `RegistryError::Conflict` if the id already exists.
    pub async fn create(&self, patient: NewPatient) -> Result<PatientId> {
        let (id, record) = patient.into_parts()?;

        let _guard = self.write_lock.lock().await;
        let mut collection = self.store.load().await?;
        if !collection.insert(id.clone(), record) {
            tracing::debug!(patient_id = %id, "Rejected duplicate patient id");
            return Err(RegistryError::patient_exists());
        }
        self.store.save(&collection).await?;

        tracing::info!(patient_id = %id, count = collection.len(), "Created patient");
        Ok(id)
    }

    /// Apply a sparse patch to an existing patient and persist the result
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` for constraint violations and
    /// `RegistryError::NotFound` if the id is absent.
    pub async fn update(&self, id: &PatientId, patch: &UpdatePatient) -> Result<PatientView> {
        patch.validate().into_result(())?;

        let _guard = self.write_lock.lock().await;
        let mut collection = self.store.load().await?;
        let existing = collection
            .get(id)
            .ok_or_else(RegistryError::patient_not_found)?;

        let merged = patch.apply(existing)?;
        let view = merged.view();
        collection.replace(id, merged);
        self.store.save(&collection).await?;

        tracing::info!(
            patient_id = %id,
            fields = ?patch.present_fields(),
            "Updated patient"
        );
        Ok(view)
    }

    /// Remove a patient
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the id is absent.
    pub async fn delete(&self, id: &PatientId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.store.load().await?;
        if collection.remove(id).is_none() {
            return Err(RegistryError::patient_not_found());
        }
        self.store.save(&collection).await?;

        tracing::info!(patient_id = %id, count = collection.len(), "Deleted patient");
        Ok(())
    }
}

//! Core business logic for the patient registry.
//!
//! # Modules
//!
//! - [`registry`] - Patient operations over a record store and sort handling
//!
//! # Request Workflow
//!
//! Each operation follows the same steps:
//!
//! 1. **Validate**: Reject malformed payloads before the store is touched
//! 2. **Load**: Read the full collection from the record store
//! 3. **Change**: Insert, merge or remove the record in memory
//! 4. **Save**: Write the full collection back (writes only)
//! 5. **Derive**: Compute BMI and verdict for the response
//!
//! # Example
//!
//! ```rust,no_run
//! use patient_registry::adapters::store::MemoryStore;
//! use patient_registry::core::registry::{PatientRegistry, SortField, SortOrder};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = PatientRegistry::new(Arc::new(MemoryStore::new()));
//!
//! let heaviest_first = registry.sort(SortField::Weight, SortOrder::Desc).await?;
//! println!("{} patients", heaviest_first.len());
//! # Ok(())
//! # }
//! ```

pub mod registry;

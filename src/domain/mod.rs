//! Domain models and types for the patient registry.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`PatientId`])
//! - **Entity model** ([`PatientRecord`], [`PatientView`], [`NewPatient`],
//!   [`Gender`], [`Verdict`]) with BMI and verdict derivation
//! - **Sparse updates** ([`UpdatePatient`], [`Patch`])
//! - **The stored collection** ([`PatientCollection`])
//! - **Error types** ([`RegistryError`], [`StoreError`], [`ValidationErrors`])
//! - **Result type alias** ([`Result`])
//!
//! # Derived fields
//!
//! BMI and verdict are never stored. They are computed from the current
//! height and weight each time a record is viewed:
//!
//! ```rust
//! use patient_registry::domain::{Gender, PatientRecord, Verdict};
//!
//! let record = PatientRecord {
//!     name: "Alice".to_string(),
//!     city: "NY".to_string(),
//!     age: 30,
//!     gender: Gender::Female,
//!     height: 1.6,
//!     weight: 60.0,
//! };
//!
//! let view = record.view();
//! assert_eq!(view.bmi, 23.44);
//! assert_eq!(view.verdict, Verdict::Normal);
//! ```

pub mod collection;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;
pub mod update;

// Re-export commonly used types for convenience
pub use collection::PatientCollection;
pub use errors::{FieldError, RegistryError, StoreError, ValidationErrors};
pub use ids::PatientId;
pub use patient::{compute_bmi, Gender, NewPatient, PatientRecord, PatientView, Verdict};
pub use result::Result;
pub use update::{Patch, UpdatePatient};

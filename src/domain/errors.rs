//! Domain error types
//!
//! This module defines the error hierarchy for the registry. Errors are
//! domain-specific and don't expose third-party types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Main registry error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more fields violated their constraints
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Patient id absent from the store
    #[error("{0}")]
    NotFound(String),

    /// Patient id already present in the store
    #[error("{0}")]
    Conflict(String),

    /// Bad query parameter
    #[error("{0}")]
    InvalidArgument(String),

    /// Persisted state unreadable or unwritable
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RegistryError {
    /// Not-found error for a patient id
    pub fn patient_not_found() -> Self {
        RegistryError::NotFound("Patient not found".to_string())
    }

    /// Conflict error for a duplicate patient id
    pub fn patient_exists() -> Self {
        RegistryError::Conflict("Patient with this ID already exists".to_string())
    }
}

/// Record store errors
///
/// These errors carry the backing location and a message only; the
/// underlying I/O or parser errors are flattened to strings.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage could not be read
    #[error("Failed to read records from {location}: {message}")]
    ReadFailed { location: String, message: String },

    /// Backing storage was read but does not hold a valid collection
    #[error("Stored records at {location} are corrupt: {message}")]
    Corrupt { location: String, message: String },

    /// Backing storage could not be written
    #[error("Failed to write records to {location}: {message}")]
    WriteFailed { location: String, message: String },
}

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the request body (empty for the body itself)
    pub field: String,

    /// Human readable description of the violation
    pub message: String,

    /// Machine readable violation kind (e.g. `greater_than`, `enum`)
    pub kind: String,
}

impl FieldError {
    /// Creates a new field error
    pub fn new(
        field: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: kind.into(),
        }
    }
}

/// Ordered list of field violations found while validating one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Creates an empty error list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a violation
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Returns true when no violation was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded violations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the recorded violations
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns `Ok(value)` when empty, otherwise a validation error
    pub fn into_result<T>(self, value: T) -> Result<T, RegistryError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(RegistryError::Validation(self))
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| {
                if e.field.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.field, e.message)
                }
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        RegistryError::Configuration(format!("TOML parse error: {err}"))
    }
}

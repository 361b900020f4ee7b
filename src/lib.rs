// Patient Registry - Patient record management service
// Copyright (c) 2025 Patient Registry Contributors
// Licensed under the MIT License

//! # Patient Registry
//!
//! A small HTTP service that keeps patient records in a single JSON file and
//! reports each patient's body mass index and health verdict.
//!
//! ## Overview
//!
//! This library provides:
//! - **Records** with validated demographics and body measurements
//! - **Derived fields** (`bmi`, `verdict`) computed on every read, never stored
//! - **Operations** to list, fetch, sort, create, patch and delete patients
//! - **Storage** behind the [`adapters::store::RecordStore`] trait, with an
//!   atomically rewritten JSON file and an in-memory backend
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - HTTP routes and error responses
//! - [`core`] - Registry operations and sorting
//! - [`adapters`] - Record store backends
//! - [`domain`] - Patient types, validation and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patient_registry::adapters::store::JsonFileStore;
//! use patient_registry::api::app;
//! use patient_registry::core::registry::PatientRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(JsonFileStore::new("patients.json"));
//!     let registry = Arc::new(PatientRegistry::new(store));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app(registry)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Derived Fields
//!
//! ```rust
//! use patient_registry::domain::{compute_bmi, Verdict};
//!
//! let bmi = compute_bmi(1.6, 60.0);
//! assert_eq!(bmi, 23.44);
//! assert_eq!(Verdict::from_bmi(bmi), Verdict::Normal);
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::RegistryError`]; the HTTP layer
//! maps each variant to a status code.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

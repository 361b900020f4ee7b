//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human readable or JSON console output
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use patient_registry::logging::init_logging;
//! use patient_registry::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(patient_id = "P001", "Created patient");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

//! Configuration management for the patient registry.
//!
//! # Overview
//!
//! The registry reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REGISTRY_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - Listener address and shutdown grace period
//! - [`StorageConfig`] - Record store backend and file location
//! - [`LoggingConfig`] - Console format and rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [storage]
//! backend = "json_file"
//! path = "${REGISTRY_DATA_DIR}/patients.json"
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/patient-registry"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use patient_registry::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("registry.toml")?;
//! println!("Listening on {}", config.server.bind_address());
//! println!("Records in {}", config.storage.path);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, RegistryConfig, ServerConfig, StorageBackend, StorageConfig,
};

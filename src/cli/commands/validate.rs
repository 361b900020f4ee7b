//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the registry configuration file.

use crate::config::{load_config, StorageBackend};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Parsing, overrides and validation all happen in the loader
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.bind_address());
        println!(
            "  Shutdown Timeout: {}s",
            config.server.shutdown_timeout_secs
        );
        println!("  Storage Backend: {}", config.storage.backend);
        if config.storage.backend == StorageBackend::JsonFile {
            println!("  Record File: {}", config.storage.path);
            println!("  Create If Missing: {}", config.storage.create_if_missing);
        }
        if config.logging.local_enabled {
            println!(
                "  File Logs: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  File Logs: disabled");
        }
        println!();
        Ok(0)
    }
}

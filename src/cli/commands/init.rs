//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "registry.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing patient registry configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: patient-registry validate-config");
                println!("  3. Start the service: patient-registry serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Sample configuration with every setting at its default
    fn generate_config() -> String {
        r#"# Patient Registry Configuration File
#
# Every setting below shows its default value. Values may reference
# environment variables as ${VAR_NAME}, and any setting can be overridden
# with REGISTRY_<SECTION>_<KEY> (e.g. REGISTRY_SERVER_PORT).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# HTTP Server
# ============================================================================
[server]
host = "127.0.0.1"
port = 8000

# Seconds to wait for in-flight requests after SIGINT/SIGTERM (1-300)
shutdown_timeout_secs = 30

# ============================================================================
# Record Storage
# ============================================================================
[storage]
# json_file | memory
backend = "json_file"

# Record file; the whole collection is rewritten atomically on each change
path = "patients.json"
# path = "${REGISTRY_DATA_DIR}/patients.json"

# Treat a missing record file as an empty registry
create_if_missing = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# Emit console logs as JSON lines
json_console = false

# JSON file logs with rotation (daily, hourly, never)
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }
}

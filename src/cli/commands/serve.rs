//! Serve command implementation
//!
//! This module implements the `serve` command, which runs the HTTP service
//! until a shutdown signal arrives.

use crate::adapters::store::create_record_store;
use crate::api::app;
use crate::config::{load_config_or_default, RegistryConfig, StorageBackend};
use crate::core::registry::PatientRegistry;
use crate::logging::init_logging;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Override the TCP port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the JSON record file (implies the json_file backend)
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        log_level: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let (mut config, found) = match load_config_or_default(config_path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };
        // Overrides come from the command line, after env substitution
        self.apply_overrides(&mut config);
        if let Err(e) = config.validate() {
            eprintln!("❌ Invalid configuration: {e}");
            return Ok(2);
        }

        let level = log_level.unwrap_or(config.application.log_level.as_str());
        let _log_guard = match init_logging(level, &config.logging) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                return Ok(2);
            }
        };

        if found {
            tracing::info!(config_path = %config_path, "Configuration loaded");
        } else {
            tracing::warn!(
                config_path = %config_path,
                "Configuration file not found, using defaults"
            );
        }

        let store = create_record_store(&config.storage);
        let registry = Arc::new(PatientRegistry::new(store));

        let address = config.server.bind_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Failed to bind listener");
                eprintln!("❌ Cannot bind {address}: {e}");
                return Ok(4); // Bind error exit code
            }
        };

        tracing::info!(
            address = %address,
            backend = %config.storage.backend,
            store = %registry.store_location(),
            "Patient registry listening"
        );

        let router = app(registry);
        let mut server = tokio::spawn({
            let signal = shutdown_signal.clone();
            async move {
                axum::serve(listener, router)
                    .with_graceful_shutdown(wait_for_shutdown(signal))
                    .await
            }
        });

        tokio::select! {
            result = &mut server => return finish(result),
            _ = wait_for_shutdown(shutdown_signal) => {}
        }

        let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
        tracing::info!(
            timeout_secs = grace.as_secs(),
            "Waiting for in-flight requests"
        );
        match tokio::time::timeout(grace, &mut server).await {
            Ok(result) => finish(result),
            Err(_) => {
                tracing::warn!("Shutdown timeout elapsed, dropping open connections");
                server.abort();
                Ok(0)
            }
        }
    }

    fn apply_overrides(&self, config: &mut RegistryConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.data_file {
            config.storage.backend = StorageBackend::JsonFile;
            config.storage.path = path.clone();
        }
    }
}

/// Resolves once the shutdown flag is raised; never resolves if the sender
/// is gone without raising it
async fn wait_for_shutdown(mut signal: watch::Receiver<bool>) {
    loop {
        if *signal.borrow_and_update() {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn finish(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> anyhow::Result<i32> {
    match result {
        Ok(Ok(())) => {
            tracing::info!("Server stopped");
            Ok(0)
        }
        Ok(Err(e)) => Err(anyhow::anyhow!("Server error: {e}")),
        Err(e) => Err(anyhow::anyhow!("Server task failed: {e}")),
    }
}

//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RegistryConfig;
use crate::domain::errors::RegistryError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RegistryConfig
/// 4. Applies environment variable overrides (REGISTRY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use patient_registry::config::loader::load_config;
///
/// let config = load_config("registry.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RegistryConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RegistryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RegistryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from a TOML file, falling back to defaults when the
/// file does not exist
///
/// Environment overrides and validation apply in both cases. The returned
/// flag tells whether the file was found.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed, or if the
/// resulting configuration is invalid.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<(RegistryConfig, bool)> {
    let path = path.as_ref();

    if path.exists() {
        return load_config(path).map(|config| (config, true));
    }

    let mut config = RegistryConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok((config, false))
}

/// Parses TOML text into a validated configuration
///
/// # Errors
///
/// Returns an error if substitution, parsing, overrides or validation fail.
pub fn parse_config(contents: &str) -> Result<RegistryConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RegistryConfig = toml::from_str(&contents)
        .map_err(|e| RegistryError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &RegistryConfig) -> Result<()> {
    config.validate().map_err(|e| {
        RegistryError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RegistryError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RegistryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using REGISTRY_* prefix
///
/// Environment variables follow the pattern: REGISTRY_<SECTION>_<KEY>
/// For example: REGISTRY_SERVER_PORT, REGISTRY_STORAGE_PATH
///
/// # Errors
///
/// Returns an error if a numeric or enumerated override cannot be parsed.
fn apply_env_overrides(config: &mut RegistryConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("REGISTRY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Ok(val) = std::env::var("REGISTRY_SERVER_HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("REGISTRY_SERVER_PORT") {
        config.server.port = val.parse().map_err(|_| {
            RegistryError::Configuration(format!("Invalid REGISTRY_SERVER_PORT '{val}'"))
        })?;
    }
    if let Ok(val) = std::env::var("REGISTRY_SERVER_SHUTDOWN_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.server.shutdown_timeout_secs = secs;
        }
    }

    // Storage overrides
    if let Ok(val) = std::env::var("REGISTRY_STORAGE_BACKEND") {
        config.storage.backend = val.parse().map_err(RegistryError::Configuration)?;
    }
    if let Ok(val) = std::env::var("REGISTRY_STORAGE_PATH") {
        config.storage.path = val;
    }
    if let Ok(val) = std::env::var("REGISTRY_STORAGE_CREATE_IF_MISSING") {
        config.storage.create_if_missing = val.parse().unwrap_or(true);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("REGISTRY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("REGISTRY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("REGISTRY_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
    if let Ok(val) = std::env::var("REGISTRY_LOGGING_JSON_CONSOLE") {
        config.logging.json_console = val.parse().unwrap_or(false);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("REGISTRY_LOADER_TEST_VAR", "test_value");
        let input = "path = \"${REGISTRY_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"test_value\"\n");
        std::env::remove_var("REGISTRY_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("REGISTRY_LOADER_MISSING_VAR");
        let input = "path = \"${REGISTRY_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("REGISTRY_LOADER_COMMENTED_VAR");
        let input = "# path = \"${REGISTRY_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-registry.toml");
        assert!(matches!(result, Err(RegistryError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9100

[storage]
path = "/var/lib/registry/patients.json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.server.bind_address(), "0.0.0.0:9100");
        assert_eq!(config.storage.path, "/var/lib/registry/patients.json");
        assert!(config.storage.create_if_missing);
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let result = parse_config("[server]\nport = 0\n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration validation failed"));
    }

    #[test]
    fn test_parse_config_rejects_bad_toml() {
        assert!(parse_config("[server\nport = ").is_err());
    }
}

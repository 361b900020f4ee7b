//! Result type alias for the registry

use super::errors::RegistryError;

/// Result type alias for registry operations
///
/// # Examples
///
/// ```
/// use patient_registry::domain::result::Result;
/// use patient_registry::domain::errors::RegistryError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RegistryError::InvalidArgument("bad order".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RegistryError>;

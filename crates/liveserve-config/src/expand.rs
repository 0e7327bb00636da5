//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a configuration value.
///
/// Supports `${VAR}` (errors if unset) and `${VAR:-default}` (falls back
/// to the default when unset). Plain strings pass through unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.to_string(),
        })
}

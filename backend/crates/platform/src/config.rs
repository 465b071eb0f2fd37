//! Environment Configuration Helpers
//!
//! Typed access to environment variables. Blank values count as unset.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Variable is set but cannot be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Read a variable, treating blank values as unset
pub fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable or fall back to `default`
pub fn env_or(key: &str, default: &str) -> String {
    env_string(key).unwrap_or_else(|| default.to_string())
}

/// Read and parse a variable, falling back to `default` when unset
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env_string(key) {
        None => Ok(default),
        Some(value) => parse_value(key, &value),
    }
}

/// Read a boolean flag (`1/0`, `true/false`, `yes/no`, `on/off`)
pub fn env_flag(key: &str, default: bool) -> Result<bool, ConfigError> {
    match env_string(key) {
        None => Ok(default),
        Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

/// Parse a boolean flag value
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

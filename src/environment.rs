use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Reads and parses an environment variable.
///
/// Returns `Ok(None)` when the variable is unset or blank, and an error when it
/// is set to something that does not parse.
pub fn get_env_var_parsed<T: FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: var.to_string(),
                value: raw,
            }),
        _ => Ok(None),
    }
}

/// Reads a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn get_env_var_bool(var: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                name: var.to_string(),
                value: raw,
            }),
        },
        Err(_) => Ok(None),
    }
}

/// Reads a duration expressed in whole seconds.
pub fn get_env_var_secs(var: &str) -> Result<Option<Duration>, ConfigError> {
    Ok(get_env_var_parsed::<u64>(var)?.map(Duration::from_secs))
}

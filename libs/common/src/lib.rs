//! Common library for the project portal services
//!
//! This crate provides shared functionality used by the `auth` and `api`
//! services: tenant identifiers, PostgreSQL connectivity, the key-value
//! store used for sessions, the store error taxonomy and logging setup.

pub mod cache;
pub mod database;
pub mod error;
pub mod telemetry;
pub mod tenant;
pub mod timeout;

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

/// Parse an environment variable, falling back to `default` when unset
///
/// A set-but-unparsable value is an error rather than a silent default.
pub fn env_or<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::new(var, e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`)
pub fn env_flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::new(var, format!("not a boolean: {other}"))),
        },
        Err(_) => Ok(default),
    }
}

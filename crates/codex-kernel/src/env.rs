//! Environment-variable helpers for service entry points.
//!
//! A missing variable silently yields the default; a present but unparseable
//! one logs a warning and yields the default.

use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Parse `key` as `T`, falling back to `default`.
pub fn var_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

/// Read `key` as a string, falling back to `default`.
pub fn string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    raw.trim().parse().unwrap_or_else(|e| {
        warn!(key, value = raw, error = %e, default = %default, "invalid environment value, using default");
        default
    })
}

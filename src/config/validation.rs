//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Validation is a pure
//! function over the config and returns all errors, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("cors.allowed_origins contains an empty entry")]
    EmptyOrigin,

    /// Membership is exact-match, so an entry carrying a path or trailing
    /// slash can never equal a browser-sent `Origin` header.
    #[error("cors.allowed_origins entry {0:?} is not a bare origin (scheme://host[:port])")]
    MalformedOrigin(String),
}

/// Validate a config, collecting every problem.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for origin in &config.cors.allowed_origins {
        if origin.is_empty() {
            errors.push(ValidationError::EmptyOrigin);
        } else if !origin.contains("://") || origin.ends_with('/') {
            errors.push(ValidationError::MalformedOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

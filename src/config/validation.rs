//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check upstream origins are usable base URLs
//! - Validate value ranges (attempts >= 1, timeouts > 0, delays ordered)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: scheme '{scheme}' is not http or https")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("{field}: '{value}' must end with '/'")]
    MissingTrailingSlash { field: &'static str, value: String },

    #[error("fetch.max_attempts must be at least 1")]
    NoAttempts,

    #[error("fetch.attempt_timeout_secs must be greater than 0")]
    ZeroAttemptTimeout,

    #[error("fetch.base_delay_ms ({base}) exceeds fetch.max_delay_ms ({max})")]
    DelayOrder { base: u64, max: u64 },

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("listener.bind_address: '{0}' is not a socket address")]
    InvalidBindAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_base_url("upstream.assets_url", &config.upstream.assets_url, &mut errors);
    check_base_url("upstream.api_url", &config.upstream.api_url, &mut errors);

    if config.fetch.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }
    if config.fetch.attempt_timeout_secs == 0 {
        errors.push(ValidationError::ZeroAttemptTimeout);
    }
    if config.fetch.base_delay_ms > config.fetch.max_delay_ms {
        errors.push(ValidationError::DelayOrder {
            base: config.fetch.base_delay_ms,
            max: config.fetch.max_delay_ms,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme {
                    field,
                    scheme: url.scheme().to_string(),
                });
            }
            // Joining is plain concatenation, so the base must be a directory.
            if !value.ends_with('/') {
                errors.push(ValidationError::MissingTrailingSlash {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Err(_) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

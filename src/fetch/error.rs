//! Error types for upstream fetching.

use std::time::Duration;

use thiserror::Error;

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Connection, TLS or body read failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The attempt exceeded its deadline.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The body was not the JSON document expected.
    #[error("invalid JSON body: {0}")]
    Json(String),
}

/// A fetch that exhausted its attempt budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("GET {url} failed after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    /// Cause of the last attempt's failure.
    #[source]
    pub cause: TransportError,
}

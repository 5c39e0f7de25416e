//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins (asset host and configuration API).
    pub upstream: UpstreamConfig,

    /// Retry and timeout budget for upstream fetches.
    pub fetch: FetchConfig,

    /// Cache-Control durations for routed responses.
    pub cache: CacheControlConfig,

    /// Path matching policy.
    pub routing: RoutingConfig,

    /// Timeout configuration for the HTTP adapter.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origins. Both URLs must end in `/`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the static asset host (manifest and app index pages).
    pub assets_url: String,

    /// Base URL of the configuration API.
    pub api_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            assets_url: "http://localhost:9000/assets/".to_string(),
            api_url: "http://localhost:9000/api/".to_string(),
        }
    }
}

/// Upstream fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of attempts per fetch (first try included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds. Zero disables backoff.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Deadline for a single attempt in seconds.
    pub attempt_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 50,
            max_delay_ms: 1000,
            attempt_timeout_secs: 10,
        }
    }
}

/// Cache-Control durations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheControlConfig {
    /// `max-age` for end clients.
    pub client_cache_secs: u64,

    /// `s-maxage` for shared caches. Omitted from responses when unset.
    pub shared_cache_secs: Option<u64>,
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self {
            client_cache_secs: 60,
            shared_cache_secs: Some(300),
        }
    }
}

/// Which characters an app id may contain.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppIdPolicy {
    /// ASCII letters and digits only.
    Strict,
    /// ASCII letters, digits, `-` and `_`.
    #[default]
    Extended,
}

/// Path matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    pub app_id_policy: AppIdPolicy,
}

/// Timeout configuration for the HTTP adapter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

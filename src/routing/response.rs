//! Transport-neutral responses and their caching directives.

use std::collections::BTreeMap;

use serde_json::json;

use crate::config::CacheControlConfig;

pub const CACHE_CONTROL: &str = "Cache-Control";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const LOCATION: &str = "Location";

/// Cache durations applied to routed responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptions {
    pub client_cache_secs: u64,
    pub shared_cache_secs: Option<u64>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self::from(&CacheControlConfig::default())
    }
}

impl From<&CacheControlConfig> for RouteOptions {
    fn from(config: &CacheControlConfig) -> Self {
        Self {
            client_cache_secs: config.client_cache_secs,
            shared_cache_secs: config.shared_cache_secs,
        }
    }
}

/// Who may store a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cacheability {
    /// Clients and shared caches (CDN, proxies).
    Shared,
    /// End clients only.
    ClientOnly,
    /// Nobody; used for transient failures.
    NoStore,
}

impl Cacheability {
    pub fn directive(self, options: &RouteOptions) -> String {
        match (self, options.shared_cache_secs) {
            (Cacheability::Shared, Some(shared)) => {
                format!("max-age={}, s-maxage={}", options.client_cache_secs, shared)
            }
            (Cacheability::Shared, None) | (Cacheability::ClientOnly, _) => {
                format!("max-age={}", options.client_cache_secs)
            }
            (Cacheability::NoStore, _) => "no-store".to_string(),
        }
    }
}

/// Status, headers and optional body, ready for any hosting adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RouteResponse {
    fn new(status_code: u16, cache_control: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CACHE_CONTROL.to_string(), cache_control);
        Self {
            status_code,
            headers,
            body: None,
        }
    }

    /// 301 to `location`.
    pub fn redirect(location: String, options: &RouteOptions) -> Self {
        let mut response = Self::new(301, Cacheability::Shared.directive(options));
        response.headers.insert(LOCATION.to_string(), location);
        response
    }

    /// 200 with an HTML document.
    pub fn html(body: String, options: &RouteOptions) -> Self {
        let mut response = Self::new(200, Cacheability::Shared.directive(options));
        response
            .headers
            .insert(CONTENT_TYPE.to_string(), "text/html; charset=utf-8".to_string());
        response.body = Some(body);
        response
    }

    /// 404 with a JSON error body, cacheable by the client only.
    pub fn not_found(message: &str, options: &RouteOptions) -> Self {
        Self::error(404, message, Cacheability::ClientOnly.directive(options))
    }

    /// 500 with a generic JSON error body, never cached.
    pub fn internal_error() -> Self {
        Self::error(
            500,
            "Internal server error",
            Cacheability::NoStore.directive(&RouteOptions::default()),
        )
    }

    fn error(status_code: u16, message: &str, cache_control: String) -> Self {
        let mut response = Self::new(status_code, cache_control);
        response
            .headers
            .insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        response.body = Some(json!({ "error": message }).to_string());
        response
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

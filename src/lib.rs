//! Edge router for a catalog of single-page apps.
//!
//! Maps request paths onto apps listed in an upstream manifest, redirects
//! non-canonical paths, and serves each app's entry page with its
//! effective configuration injected.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod html;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{AppRouter, RouteOptions, RouteResponse, RouterPool, RouterSettings};

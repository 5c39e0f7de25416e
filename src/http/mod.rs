//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout)
//!     → active AppRouter (decision, cached upstream resources)
//!     → response.rs (RouteResponse → status, headers, body)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{ActiveRouter, AppState, HttpServer};

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → router.rs (manifest from the resource cache)
//!     → matcher.rs + decision.rs (redirect / not found / content)
//!     → content: index + global config → effective.rs → html transform
//!     → response.rs (status, Cache-Control, body)
//!
//! Router construction:
//!     RouterConfig
//!     → RouterSettings (origins, retry policy, app-id policy)
//!     → pool.rs (existing router for these settings, or a new one)
//! ```
//!
//! # Design Decisions
//! - Decision order is fixed; the first matching rule wins
//! - Deterministic: same path and manifest always give the same decision
//! - Redirects and pages may be cached by shared caches; 404s by clients
//!   only; 500s by nobody

pub mod decision;
pub mod effective;
pub mod matcher;
pub mod pool;
pub mod response;
pub mod router;

pub use decision::{decide, RouteDecision};
pub use pool::{RouterPool, RouterSettings};
pub use response::{Cacheability, RouteOptions, RouteResponse};
pub use router::{AppRouter, RouteError};

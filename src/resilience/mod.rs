//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream fetch:
//!     → retries.rs (attempt budget, per-attempt deadline)
//!     → On failure: backoff.rs (exponential delay with jitter)
//!     → Budget exhausted: FetchError to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream attempt has a deadline
//! - Jittered backoff prevents thundering herd on a recovering origin
//! - Failures are never cached, so the next request gets a fresh budget

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;

//! Upstream fetching subsystem.
//!
//! # Data Flow
//! ```text
//! Resource cache miss
//!     → fetcher.rs (attempt loop, deadline, backoff, JSON parsing)
//!     → transport.rs (one GET; non-2xx is an error)
//!     → body | FetchError{url, attempts, cause}
//! ```
//!
//! # Design Decisions
//! - Transport is a trait so the cache and router can run against any origin
//! - Errors are `Clone` so one failed fetch can be handed to every waiter
//! - No partial results: callers see a value or a FetchError

pub mod error;
pub mod fetcher;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FetchError, TransportError};
pub use fetcher::Fetcher;
pub use transport::{HttpTransport, Transport};

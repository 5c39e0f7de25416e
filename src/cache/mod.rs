//! Resource cache subsystem.
//!
//! # Data Flow
//! ```text
//! Router asks for a resource
//!     → resources.rs (manifest / config / index by app id)
//!     → memo.rs (existing slot? await it : store new in-flight fetch)
//!     → fetcher (on miss)
//!     → success: slot kept for the router's lifetime
//!     → failure: slot removed, error handed to every waiter
//! ```
//!
//! # Design Decisions
//! - Slots hold the shared future, not the value, so overlapping callers
//!   join one fetch
//! - No negative caching; no expiry
//! - The only mutable state shared between requests

pub mod memo;
pub mod resources;
pub mod types;

pub use memo::{Lookup, Memo};
pub use resources::ResourceCache;
pub use types::{ConfigMap, Manifest, Origins};

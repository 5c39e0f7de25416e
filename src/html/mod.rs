//! Entry page rewriting.
//!
//! # Data Flow
//! ```text
//! raw index.html + effective config
//!     → transform.rs (lol_html streaming rewrite)
//!         link[href], script[src]  relative → <assets_url><ref>
//!         script[src$=/config.js]  → inline `_app_config = {...};`
//!     → rewritten document text
//! ```
//!
//! # Design Decisions
//! - Pure function of document, config and asset base URL
//! - Streaming rewriter: untouched markup is emitted byte-for-byte

pub mod transform;

pub use transform::{HtmlTransformer, TransformError, CONFIG_GLOBAL};

//! Package extraction for browser engine bundles.
//!
//! # Architecture
//!
//! - `sanitize.rs` - Entry path validation (zip-slip protection)
//! - `extract.rs` - Streaming tar.gz extraction
//! - `layout.rs` - Per-OS layout normalization after extraction

mod error;
mod extract;
mod layout;
mod sanitize;

pub use error::{Error, Result};
pub use extract::extract;
pub use layout::normalize_layout;
pub use sanitize::{sanitize_path, sanitize_symlink_target};

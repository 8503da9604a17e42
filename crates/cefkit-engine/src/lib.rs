//! Native engine startup behind trait seams.
//!
//! # Architecture
//!
//! - `settings.rs` - Engine configuration
//! - `runtime.rs` - `EngineRuntime`/`Engine`/`EngineClient` trait seams
//! - `loader.rs` - Shared-library loading with name fallbacks
//! - `init.rs` - Startup orchestration

mod error;
mod init;
mod loader;
mod runtime;
mod settings;

pub use error::{Error, Result};
pub use init::{initialize, initialize_from_runtime};
pub use loader::LibraryLoader;
pub use runtime::{Engine, EngineClient, EngineRuntime, LibraryLoad};
pub use settings::{LogSeverity, Settings};

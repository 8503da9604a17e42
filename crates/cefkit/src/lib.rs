//! Process-wide lifecycle for an embedded Chromium engine.
//!
//! Brings an engine bundle onto disk (locate, download, extract, normalize),
//! loads its native libraries, starts the engine and shares the single
//! instance across the process until it is disposed.
//!
//! # Architecture
//!
//! - `coordinator.rs` - The lifecycle state machine
//! - `bootstrap.rs` - Install-and-start pipeline builder
//! - `progress.rs` - Pipeline progress callbacks
//! - `client.rs` - Clients derived from the shared engine
//!
//! The heavy lifting lives in the sibling crates: `cefkit-platform`
//! (host resolution), `cefkit-fetch` (release lookup and download),
//! `cefkit-archive` (extraction), `cefkit-engine` (library loading and
//! startup).
//!
//! ```no_run
//! use cefkit::{Bootstrap, Coordinator};
//! # async fn run(runtime: std::sync::Arc<dyn cefkit::EngineRuntime>) -> cefkit::Result<()> {
//! let lifecycle = Coordinator::new();
//! lifecycle
//!     .init(
//!         Bootstrap::new(runtime).install_dir("cef-bundle"),
//!         |error| eprintln!("init error: {error}"),
//!         || eprintln!("restart required"),
//!     )
//!     .await?;
//!
//! let client = lifecycle.new_client().await?;
//! # drop(client);
//! lifecycle.dispose().await;
//! # Ok(())
//! # }
//! ```

mod bootstrap;
mod client;
mod coordinator;
mod error;
mod progress;

pub use bootstrap::Bootstrap;
pub use client::Client;
pub use coordinator::Coordinator;
pub use error::{CefError, Result};
pub use progress::InitProgress;

pub use cefkit_engine::{
    Engine, EngineClient, EngineRuntime, LibraryLoad, LogSeverity, Settings,
};
pub use cefkit_fetch::PackageSource;
pub use cefkit_platform::{Arch, Os, Platform};

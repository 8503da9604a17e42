//! Trait seams over the native browser runtime.
//!
//! The process-wide lifecycle only ever talks to the runtime through these
//! traits, which keeps the native bindings swappable and makes the whole
//! pipeline testable without a real engine.

use std::sync::Arc;

use crate::error::Result;
use crate::settings::Settings;

/// Callback used by the runtime to load native libraries on demand.
pub trait LibraryLoad: Send + Sync {
    /// Attempt to load `name`, returning whether any candidate succeeded.
    fn load(&self, name: &str) -> bool;
}

/// The native runtime entry points needed to bring an engine up.
pub trait EngineRuntime: Send + Sync {
    /// Install the loader the runtime calls for libraries it needs later.
    fn set_library_loader(&self, loader: Arc<dyn LibraryLoad>);

    /// Perform process-level startup with the given command-line arguments.
    /// Returns `false` when the native side refuses to start.
    fn startup(&self, args: &[String]) -> bool;

    /// The engine instance created by an earlier startup in this process, if
    /// any.
    fn existing_instance(&self) -> Option<Arc<dyn Engine>>;

    /// Create the engine instance with the given settings.
    fn instance(&self, settings: &Settings) -> Result<Arc<dyn Engine>>;
}

/// A running engine.
pub trait Engine: Send + Sync {
    /// Derive a client capable of owning browsers.
    fn create_client(&self) -> Result<Box<dyn EngineClient>>;

    /// Release the engine. Called exactly once, by the lifecycle owner.
    fn dispose(&self);
}

/// A client derived from a running engine.
pub trait EngineClient: Send + Sync {
    fn dispose(&self);
}

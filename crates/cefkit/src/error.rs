use std::sync::Arc;

pub type Result<T> = std::result::Result<T, CefError>;

/// Everything that can go wrong between "nothing installed" and "engine
/// running".
#[derive(Debug, thiserror::Error)]
pub enum CefError {
    #[error(transparent)]
    Platform(#[from] cefkit_platform::Error),

    #[error(transparent)]
    Fetch(#[from] cefkit_fetch::Error),

    #[error(transparent)]
    Archive(#[from] cefkit_archive::Error),

    #[error(transparent)]
    Engine(#[from] cefkit_engine::Error),

    #[error("could not create the installation directory")]
    InstallationDirectory,

    #[error("could not create the installation lock file")]
    InstallationLock,

    #[error("lifecycle has not been initialized")]
    NotInitialized,

    #[error("lifecycle has been disposed")]
    Disposed,

    /// Initialization failed earlier; the cause is re-surfaced to every
    /// caller until the next `init`.
    #[error("initialization failed")]
    Init(#[source] Arc<CefError>),

    /// The engine could not start against a freshly written installation.
    /// Some platforms only pick the bundle up after a process restart.
    #[error("application restart required")]
    RestartRequired { source: Arc<CefError> },
}

//! Process-wide engine lifecycle.

use std::sync::Arc;

use cefkit_engine::Engine;
use tokio::sync::watch;

use crate::bootstrap::Bootstrap;
use crate::client::Client;
use crate::error::{CefError, Result};

/// Lifecycle of the shared engine instance.
#[derive(Clone)]
enum LifecycleState {
    New,
    Initializing,
    Initialized(Arc<dyn Engine>),
    Error(Arc<CefError>),
    Disposed,
}

impl std::fmt::Debug for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::New => "New",
            LifecycleState::Initializing => "Initializing",
            LifecycleState::Initialized(_) => "Initialized",
            LifecycleState::Error(e) => return write!(f, "Error({e})"),
            LifecycleState::Disposed => "Disposed",
        };
        f.write_str(name)
    }
}

enum Claim {
    Won,
    AlreadyRunning,
    Disposed,
}

/// Coordinates installation, startup, sharing and disposal of a single
/// engine instance.
///
/// All transitions go through one `watch` channel, so concurrent callers see
/// a linearizable state history and waiters are woken on every transition.
/// Exactly one caller wins each initialization attempt; everyone else either
/// returns immediately or waits for the outcome.
pub struct Coordinator {
    state: watch::Sender<LifecycleState>,
}

impl Coordinator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::New);
        Self { state }
    }

    /// Run the full pipeline: install the bundle if needed, start the engine,
    /// publish it.
    ///
    /// Only one caller at a time executes the pipeline. Callers that find the
    /// lifecycle `Initializing` or `Initialized` return `Ok(())` without
    /// doing anything; a disposed lifecycle is permanent and returns
    /// [`CefError::Disposed`]. A previous `Error` state may be retried by
    /// calling `init` again.
    ///
    /// `on_error` receives every failure of the attempt, including an install
    /// failure that is followed by a build attempt against a previous bundle.
    /// `on_restart_required` fires when the engine refused to start right
    /// after the bundle was (re)written; some platforms only pick a bundle up
    /// in a fresh process.
    pub async fn init(
        &self,
        bootstrap: Bootstrap,
        on_error: impl Fn(&CefError) + Send + Sync,
        on_restart_required: impl Fn() + Send + Sync,
    ) -> Result<()> {
        let mut claim = Claim::AlreadyRunning;
        self.state.send_if_modified(|state| match state {
            LifecycleState::Disposed => {
                claim = Claim::Disposed;
                false
            }
            LifecycleState::Initializing | LifecycleState::Initialized(_) => {
                claim = Claim::AlreadyRunning;
                false
            }
            LifecycleState::New | LifecycleState::Error(_) => {
                claim = Claim::Won;
                *state = LifecycleState::Initializing;
                true
            }
        });

        match claim {
            Claim::Disposed => return Err(CefError::Disposed),
            Claim::AlreadyRunning => return Ok(()),
            Claim::Won => {}
        }

        // The claim is held; everything below runs outside the channel lock
        // and ends in exactly one transition out of Initializing.

        match bootstrap.try_runtime() {
            Some(Ok(engine)) => {
                self.publish(LifecycleState::Initialized(engine));
                return Ok(());
            }
            // The native side already started, so a second startup through
            // the install pipeline is off the table.
            Some(Err(e)) => {
                let cause = Arc::new(e);
                on_error(&cause);
                self.publish(LifecycleState::Error(cause));
                return Ok(());
            }
            None => {}
        }

        if bootstrap.marker_exists() {
            bootstrap.notify_locating();
            match bootstrap.build() {
                Ok(engine) => self.publish(LifecycleState::Initialized(engine)),
                Err(e) => {
                    let cause = Arc::new(e);
                    on_error(&cause);
                    self.publish(LifecycleState::Error(cause));
                }
            }
            return Ok(());
        }

        // A failed install is reported but the build is still attempted: a
        // previously extracted bundle may be usable even when refreshing it
        // was not possible.
        if let Err(e) = bootstrap.install().await {
            tracing::warn!(error = %e, "install failed, attempting startup anyway");
            on_error(&e);
        }

        match bootstrap.build() {
            Ok(engine) => self.publish(LifecycleState::Initialized(engine)),
            Err(e) => {
                let cause = Arc::new(e);
                on_error(&cause);
                self.publish(LifecycleState::Error(Arc::new(CefError::RestartRequired {
                    source: cause,
                })));
                on_restart_required();
            }
        }
        Ok(())
    }

    /// Derive a fresh client from the shared engine, waiting for a running
    /// initialization to settle first.
    pub async fn new_client(&self) -> Result<Client> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, LifecycleState::Initializing))
            .await
            .map_err(|_| CefError::Disposed)?;

        match &*state {
            LifecycleState::New => Err(CefError::NotInitialized),
            LifecycleState::Disposed => Err(CefError::Disposed),
            LifecycleState::Error(cause) => Err(CefError::Init(cause.clone())),
            LifecycleState::Initialized(engine) => {
                let client = engine.create_client()?;
                Ok(Client::new(client))
            }
            LifecycleState::Initializing => unreachable!("excluded by wait_for"),
        }
    }

    /// Like [`new_client`](Self::new_client), but failures go to `on_error`
    /// and `None` is returned.
    pub async fn new_client_or_report(
        &self,
        on_error: impl Fn(&CefError) + Send + Sync,
    ) -> Option<Client> {
        match self.new_client().await {
            Ok(client) => Some(client),
            Err(e) => {
                on_error(&e);
                None
            }
        }
    }

    /// Derive a client only if the engine is currently up. Never waits.
    pub fn new_possible_client(&self) -> Option<Client> {
        let engine = match &*self.state.borrow() {
            LifecycleState::Initialized(engine) => engine.clone(),
            _ => None?,
        };
        engine.create_client().ok().map(Client::new)
    }

    /// Release the engine, waiting for a running initialization to settle
    /// first. A no-op unless the engine is up; exactly one caller releases
    /// it. Disposal is terminal.
    pub async fn dispose(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx
            .wait_for(|state| !matches!(state, LifecycleState::Initializing))
            .await;

        let mut released = None;
        self.state.send_if_modified(|state| match state {
            LifecycleState::Initialized(engine) => {
                released = Some(engine.clone());
                *state = LifecycleState::Disposed;
                true
            }
            _ => false,
        });

        if let Some(engine) = released {
            tracing::info!("disposing engine");
            engine.dispose();
        }
    }

    fn publish(&self, state: LifecycleState) {
        tracing::debug!(next = ?state, "lifecycle transition");
        self.state.send_replace(state);
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

//! The install-and-start pipeline behind [`Coordinator::init`].
//!
//! [`Coordinator::init`]: crate::Coordinator::init

use std::path::PathBuf;
use std::sync::Arc;

use cefkit_archive::{extract, normalize_layout};
use cefkit_engine::{
    Engine, EngineRuntime, LibraryLoad, LibraryLoader, Settings, initialize,
    initialize_from_runtime,
};
use cefkit_fetch::{HttpPackageSource, PackageSource};
use cefkit_platform::{Os, Platform};

use crate::error::{CefError, Result};
use crate::progress::InitProgress;

const INSTALL_MARKER: &str = "install.lock";

const DEFAULT_DOWNLOAD_BUFFER: usize = 16 * 1024;
const DEFAULT_EXTRACT_BUFFER: usize = 4096;

/// Builder for one initialization attempt: where the bundle lives, which
/// release to fetch, how to start the engine, and who to tell about progress.
///
/// The package source and engine runtime are injectable so the whole pipeline
/// runs against fakes in tests.
pub struct Bootstrap {
    install_dir: PathBuf,
    release_tag: Option<String>,
    download_buffer_size: usize,
    extract_buffer_size: usize,
    args: Vec<String>,
    settings: Settings,
    progress: InitProgress,
    platform: Option<Platform>,
    source: Arc<dyn PackageSource>,
    runtime: Arc<dyn EngineRuntime>,
    library_loader: Option<Arc<dyn LibraryLoad>>,
}

impl Bootstrap {
    pub fn new(runtime: Arc<dyn EngineRuntime>) -> Self {
        Self {
            install_dir: PathBuf::from("jcef-bundle"),
            release_tag: None,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER,
            extract_buffer_size: DEFAULT_EXTRACT_BUFFER,
            args: Vec::new(),
            settings: Settings::default(),
            progress: InitProgress::new(),
            platform: None,
            source: Arc::new(HttpPackageSource::new()),
            runtime,
            library_loader: None,
        }
    }

    /// Directory the bundle is installed into. Defaults to `jcef-bundle`
    /// relative to the working directory.
    pub fn install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = dir.into();
        self
    }

    /// Pin a release tag; the latest release is used otherwise.
    pub fn release(mut self, tag: impl Into<String>) -> Self {
        self.release_tag = Some(tag.into());
        self
    }

    pub fn download_buffer(mut self, size: usize) -> Self {
        if size > 0 {
            self.download_buffer_size = size;
        }
        self
    }

    pub fn extract_buffer(mut self, size: usize) -> Self {
        if size > 0 {
            self.extract_buffer_size = size;
        }
        self
    }

    /// Replace the engine command-line arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Append engine command-line arguments.
    pub fn add_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn progress(mut self, progress: InitProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Override the resolved platform instead of detecting the host.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Replace the package source, e.g. with a mirror or an offline copy.
    pub fn source(mut self, source: Arc<dyn PackageSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the native library loader, e.g. when the host preloads the
    /// engine libraries itself.
    pub fn library_loader(mut self, loader: Arc<dyn LibraryLoad>) -> Self {
        self.library_loader = Some(loader);
        self
    }

    fn resolved_platform(&self) -> Result<Platform> {
        match self.platform {
            Some(platform) => Ok(platform),
            None => Ok(Platform::current()?),
        }
    }

    pub(crate) fn marker_exists(&self) -> bool {
        self.install_dir.join(INSTALL_MARKER).exists()
    }

    pub(crate) fn notify_locating(&self) {
        self.progress.locating();
    }

    fn ambient_loader(&self, os: Os) -> Arc<dyn LibraryLoad> {
        match &self.library_loader {
            Some(loader) => loader.clone(),
            None => Arc::new(LibraryLoader::new("", os)),
        }
    }

    fn bundle_loader(&self, os: Os) -> Arc<dyn LibraryLoad> {
        match &self.library_loader {
            Some(loader) => loader.clone(),
            None => Arc::new(LibraryLoader::new(&self.install_dir, os)),
        }
    }

    /// Engine startup straight from the ambient library search path, for
    /// hosts whose runtime already bundles the engine. `None` means the
    /// regular install pipeline has to run; `Some(Err(..))` means the native
    /// side already started, so the attempt is settled either way.
    pub(crate) fn try_runtime(&self) -> Option<Result<Arc<dyn Engine>>> {
        let platform = self.resolved_platform().ok()?;
        let outcome = initialize_from_runtime(
            &self.runtime,
            self.ambient_loader(platform.os),
            &self.args,
            self.settings.clone(),
        )?;
        if outcome.is_ok() {
            tracing::info!("engine started from the host runtime, skipping install");
        }
        Some(outcome.map_err(CefError::from))
    }

    /// Make sure a complete bundle sits in the install directory.
    ///
    /// A directory carrying the install marker is trusted as-is. Anything
    /// else is treated as a partial install: wiped, re-downloaded, extracted,
    /// normalized and finally marked.
    pub(crate) async fn install(&self) -> Result<()> {
        self.progress.locating();
        if self.marker_exists() {
            tracing::debug!(dir = %self.install_dir.display(), "bundle already installed");
            return Ok(());
        }

        let platform = self.resolved_platform()?;

        // A directory without a marker is a partial install; extracting over
        // it would mix two bundles, so a failed wipe is an error.
        if self.install_dir.exists() {
            std::fs::remove_dir_all(&self.install_dir)
                .map_err(|_| CefError::InstallationDirectory)?;
        }
        std::fs::create_dir_all(&self.install_dir)
            .map_err(|_| CefError::InstallationDirectory)?;

        let url = self
            .source
            .locate(self.release_tag.as_deref(), platform)
            .await?;

        self.progress.downloading(0.0);
        let archive = self
            .source
            .download(&url, self.download_buffer_size, &|percent| {
                self.progress.downloading(percent)
            })
            .await?;

        self.progress.extracting();
        extract(&self.install_dir, &archive, self.extract_buffer_size)?;
        normalize_layout(&self.install_dir, platform.os)?;

        self.progress.install();
        if platform.os.is_macos() {
            unquarantine(&self.install_dir);
        }

        std::fs::File::create(self.install_dir.join(INSTALL_MARKER))
            .map_err(|_| CefError::InstallationLock)?;

        Ok(())
    }

    /// Load the native libraries and start the engine against the installed
    /// bundle.
    pub(crate) fn build(&self) -> Result<Arc<dyn Engine>> {
        self.progress.initializing();
        let platform = self.resolved_platform()?;
        let engine = initialize(
            &self.runtime,
            self.bundle_loader(platform.os),
            &self.install_dir,
            &self.args,
            self.settings.clone(),
            platform.os,
        )?;
        self.progress.initialized();
        Ok(engine)
    }
}

/// Gatekeeper blocks downloaded binaries until the quarantine attribute is
/// removed. Failure only means the user gets the usual prompt.
fn unquarantine(dir: &std::path::Path) {
    let status = std::process::Command::new("xattr")
        .arg("-r")
        .arg("-d")
        .arg("com.apple.quarantine")
        .arg(dir)
        .status();
    if let Err(e) = status {
        tracing::debug!(error = %e, "could not remove quarantine attribute");
    }
}

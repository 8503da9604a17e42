//! Fire-and-forget progress callbacks for the bootstrap pipeline.

type Callback = Box<dyn Fn() + Send + Sync>;
type PercentCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Observer for the install/startup pipeline. Every callback is optional and
/// must not block; failures are reported through the `init` error surface,
/// not here.
#[derive(Default)]
pub struct InitProgress {
    locating: Option<Callback>,
    downloading: Option<PercentCallback>,
    extracting: Option<Callback>,
    install: Option<Callback>,
    initializing: Option<Callback>,
    initialized: Option<Callback>,
}

impl InitProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release lookup has started.
    pub fn on_locating(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.locating = Some(Box::new(f));
        self
    }

    /// Download progress in percent, 0 when the total size is unknown.
    pub fn on_downloading(mut self, f: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.downloading = Some(Box::new(f));
        self
    }

    /// The downloaded package is being extracted.
    pub fn on_extracting(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.extracting = Some(Box::new(f));
        self
    }

    /// Extraction finished, the installation is being finalized.
    pub fn on_install(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.install = Some(Box::new(f));
        self
    }

    /// Native libraries are being loaded and the engine started.
    pub fn on_initializing(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.initializing = Some(Box::new(f));
        self
    }

    /// The engine is up.
    pub fn on_initialized(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.initialized = Some(Box::new(f));
        self
    }

    pub(crate) fn locating(&self) {
        if let Some(f) = &self.locating {
            f();
        }
    }

    pub(crate) fn downloading(&self, percent: f32) {
        if let Some(f) = &self.downloading {
            f(percent);
        }
    }

    pub(crate) fn extracting(&self) {
        if let Some(f) = &self.extracting {
            f();
        }
    }

    pub(crate) fn install(&self) {
        if let Some(f) = &self.install {
            f();
        }
    }

    pub(crate) fn initializing(&self) {
        if let Some(f) = &self.initializing {
            f();
        }
    }

    pub(crate) fn initialized(&self) {
        if let Some(f) = &self.initialized {
            f();
        }
    }
}

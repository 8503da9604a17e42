//! End-to-end lifecycle tests against mock source and runtime seams.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write as _;

use cefkit::{
    Bootstrap, CefError, Coordinator, Engine, EngineClient, EngineRuntime, InitProgress,
    LibraryLoad, PackageSource, Platform, Settings,
};

fn linux_platform() -> Platform {
    Platform::resolve("linux", "amd64").unwrap()
}

struct MockClient;

impl EngineClient for MockClient {
    fn dispose(&self) {}
}

struct MockEngine {
    dispose_count: Arc<AtomicUsize>,
}

impl Engine for MockEngine {
    fn create_client(&self) -> cefkit_engine::Result<Box<dyn EngineClient>> {
        Ok(Box::new(MockClient))
    }

    fn dispose(&self) {
        self.dispose_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Pretends every library is already on the ambient search path.
struct MockLoader;

impl LibraryLoad for MockLoader {
    fn load(&self, _name: &str) -> bool {
        true
    }
}

struct MockRuntime {
    startup_ok: bool,
    instance_ok: bool,
    startup_calls: AtomicUsize,
    instance_calls: AtomicUsize,
    dispose_count: Arc<AtomicUsize>,
}

impl MockRuntime {
    fn new(startup_ok: bool) -> Arc<Self> {
        Arc::new(Self {
            startup_ok,
            instance_ok: true,
            startup_calls: AtomicUsize::new(0),
            instance_calls: AtomicUsize::new(0),
            dispose_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn failing_instance() -> Arc<Self> {
        Arc::new(Self {
            startup_ok: true,
            instance_ok: false,
            startup_calls: AtomicUsize::new(0),
            instance_calls: AtomicUsize::new(0),
            dispose_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

impl EngineRuntime for MockRuntime {
    fn set_library_loader(&self, _loader: Arc<dyn LibraryLoad>) {}

    fn startup(&self, _args: &[String]) -> bool {
        self.startup_calls.fetch_add(1, Ordering::SeqCst);
        self.startup_ok
    }

    fn existing_instance(&self) -> Option<Arc<dyn Engine>> {
        None
    }

    fn instance(&self, _settings: &Settings) -> cefkit_engine::Result<Arc<dyn Engine>> {
        self.instance_calls.fetch_add(1, Ordering::SeqCst);
        if !self.instance_ok {
            return Err(cefkit_engine::Error::InstanceUnavailable);
        }
        Ok(Arc::new(MockEngine {
            dispose_count: self.dispose_count.clone(),
        }))
    }
}

/// Serves a small but real tar.gz bundle from disk instead of the network.
struct MockSource {
    scratch: PathBuf,
    fail_locate: bool,
    delay: Option<std::time::Duration>,
    locate_calls: AtomicUsize,
    download_calls: AtomicUsize,
}

impl MockSource {
    fn base(scratch: &Path) -> Self {
        Self {
            scratch: scratch.to_path_buf(),
            fail_locate: false,
            delay: None,
            locate_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
        }
    }

    fn new(scratch: &Path) -> Arc<Self> {
        Arc::new(Self::base(scratch))
    }

    fn failing_locate(scratch: &Path) -> Arc<Self> {
        Arc::new(Self {
            fail_locate: true,
            ..Self::base(scratch)
        })
    }

    fn slow(scratch: &Path, delay: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::base(scratch)
        })
    }

    fn write_bundle(&self) -> PathBuf {
        let path = self
            .scratch
            .join(format!("bundle-{}.tar.gz", self.download_calls.load(Ordering::SeqCst)));
        let encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(4);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "jbr-release/lib/libcef.so", &b"mock"[..])
            .unwrap();

        let mut encoder = builder.into_inner().unwrap();
        encoder.flush().unwrap();
        encoder.finish().unwrap();
        path
    }
}

#[async_trait]
impl PackageSource for MockSource {
    async fn locate(
        &self,
        _tag: Option<&str>,
        _platform: Platform,
    ) -> cefkit_fetch::Result<String> {
        self.locate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_locate {
            return Err(cefkit_fetch::Error::Download);
        }
        Ok("https://example.invalid/jcef.tar.gz".to_string())
    }

    async fn download(
        &self,
        _url: &str,
        _buffer_size: usize,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> cefkit_fetch::Result<PathBuf> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        on_progress(50.0);
        on_progress(100.0);
        Ok(self.write_bundle())
    }
}

fn bootstrap(
    runtime: &Arc<MockRuntime>,
    source: &Arc<MockSource>,
    install_dir: &Path,
) -> Bootstrap {
    Bootstrap::new(runtime.clone())
        .source(source.clone())
        .install_dir(install_dir)
        .platform(linux_platform())
        .args(["--disable-gpu"])
}

#[tokio::test]
async fn full_pipeline_fires_callbacks_in_order() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(true);
    let source = MockSource::new(temp.path());

    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let push = |events: &Arc<Mutex<Vec<String>>>, label: &'static str| {
        let events = events.clone();
        move || events.lock().unwrap().push(label.to_string())
    };
    let progress = InitProgress::new()
        .on_locating(push(&events, "locating"))
        .on_downloading({
            let events = events.clone();
            move |percent| events.lock().unwrap().push(format!("downloading {percent}"))
        })
        .on_extracting(push(&events, "extracting"))
        .on_install(push(&events, "install"))
        .on_initializing(push(&events, "initializing"))
        .on_initialized(push(&events, "initialized"));

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir).progress(progress),
            |e| panic!("unexpected error: {e}"),
            || panic!("unexpected restart request"),
        )
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "locating",
            "downloading 0",
            "downloading 50",
            "downloading 100",
            "extracting",
            "install",
            "initializing",
            "initialized",
        ]
    );

    assert!(install_dir.join("install.lock").exists());
    assert!(lifecycle.new_client().await.is_ok());
}

#[tokio::test]
async fn existing_marker_skips_download_and_extract() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    std::fs::create_dir_all(&install_dir).unwrap();
    std::fs::write(install_dir.join("install.lock"), b"").unwrap();

    let runtime = MockRuntime::new(true);
    let source = MockSource::new(temp.path());

    let locating = Arc::new(AtomicUsize::new(0));
    let progress = InitProgress::new().on_locating({
        let locating = locating.clone();
        move || {
            locating.fetch_add(1, Ordering::SeqCst);
        }
    });

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir).progress(progress),
            |e| panic!("unexpected error: {e}"),
            || {},
        )
        .await
        .unwrap();

    assert_eq!(source.locate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.download_calls.load(Ordering::SeqCst), 0);
    assert_eq!(runtime.startup_calls.load(Ordering::SeqCst), 1);
    // The short-circuit still announces the lookup step.
    assert_eq!(locating.load(Ordering::SeqCst), 1);
    assert!(lifecycle.new_client().await.is_ok());
}

#[tokio::test]
async fn concurrent_init_has_a_single_winner() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(true);
    let source = MockSource::new(temp.path());

    let lifecycle = Coordinator::new();
    let (a, b) = tokio::join!(
        lifecycle.init(bootstrap(&runtime, &source, &install_dir), |_| {}, || {}),
        lifecycle.init(bootstrap(&runtime, &source, &install_dir), |_| {}, || {}),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(runtime.instance_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.download_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn new_client_waits_for_running_initialization() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(true);
    let source = MockSource::slow(temp.path(), std::time::Duration::from_millis(100));

    let lifecycle = Arc::new(Coordinator::new());
    let init_task = tokio::spawn({
        let lifecycle = lifecycle.clone();
        let bootstrap = bootstrap(&runtime, &source, &install_dir);
        async move { lifecycle.init(bootstrap, |_| {}, || {}).await }
    });

    // Give the pipeline a head start so new_client observes Initializing.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let client = lifecycle.new_client().await;
    assert!(client.is_ok());

    init_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn new_client_before_init_is_not_initialized() {
    let lifecycle = Coordinator::new();
    assert!(matches!(
        lifecycle.new_client().await,
        Err(CefError::NotInitialized)
    ));
    assert!(lifecycle.new_possible_client().is_none());
}

#[tokio::test]
async fn new_client_or_report_routes_failures_to_callback() {
    let lifecycle = Coordinator::new();
    let reported = AtomicUsize::new(0);

    let client = lifecycle
        .new_client_or_report(|e| {
            assert!(matches!(e, CefError::NotInitialized));
            reported.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert!(client.is_none());
    assert_eq!(reported.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dispose_is_terminal_and_releases_once() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(true);
    let source = MockSource::new(temp.path());

    let lifecycle = Coordinator::new();
    lifecycle
        .init(bootstrap(&runtime, &source, &install_dir), |_| {}, || {})
        .await
        .unwrap();
    assert!(lifecycle.new_possible_client().is_some());

    lifecycle.dispose().await;
    lifecycle.dispose().await;
    assert_eq!(runtime.dispose_count.load(Ordering::SeqCst), 1);

    assert!(matches!(
        lifecycle.new_client().await,
        Err(CefError::Disposed)
    ));
    assert!(lifecycle.new_possible_client().is_none());
    assert!(matches!(
        lifecycle
            .init(bootstrap(&runtime, &source, &install_dir), |_| {}, || {})
            .await,
        Err(CefError::Disposed)
    ));
}

#[tokio::test]
async fn dispose_before_init_is_a_no_op() {
    let lifecycle = Coordinator::new();
    lifecycle.dispose().await;

    // Still usable: dispose only latches from Initialized.
    assert!(matches!(
        lifecycle.new_client().await,
        Err(CefError::NotInitialized)
    ));
}

#[tokio::test]
async fn startup_failure_on_fresh_install_requires_restart() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(false);
    let source = MockSource::new(temp.path());

    let errors = AtomicUsize::new(0);
    let restarts = AtomicUsize::new(0);

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir),
            |e| {
                assert!(matches!(e, CefError::Engine(cefkit_engine::Error::Startup)));
                errors.fetch_add(1, Ordering::SeqCst);
            },
            || {
                restarts.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(restarts.load(Ordering::SeqCst), 1);

    // The failure poisons every client call until the next init.
    match lifecycle.new_client().await {
        Err(CefError::Init(cause)) => {
            assert!(matches!(&*cause, CefError::RestartRequired { .. }));
        }
        Err(e) => panic!("expected Init error, got {e}"),
        Ok(_) => panic!("expected Init error, got a client"),
    }

    // A later attempt in the same process can recover; the bundle is already
    // installed so it goes straight to startup.
    let recovered = MockRuntime::new(true);
    lifecycle
        .init(
            bootstrap(&recovered, &source, &install_dir),
            |e| panic!("unexpected error: {e}"),
            || panic!("unexpected restart request"),
        )
        .await
        .unwrap();
    assert_eq!(source.download_calls.load(Ordering::SeqCst), 1);
    assert!(lifecycle.new_client().await.is_ok());
}

#[tokio::test]
async fn failed_install_still_attempts_startup() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(true);
    let source = MockSource::failing_locate(temp.path());

    let errors = AtomicUsize::new(0);

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir),
            |e| {
                assert!(matches!(e, CefError::Fetch(_)));
                errors.fetch_add(1, Ordering::SeqCst);
            },
            || panic!("unexpected restart request"),
        )
        .await
        .unwrap();

    // The install failure was reported, but startup against whatever is on
    // disk still went ahead and succeeded.
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(runtime.startup_calls.load(Ordering::SeqCst), 1);
    assert!(lifecycle.new_client().await.is_ok());
}

#[tokio::test]
async fn bundled_runtime_skips_install_entirely() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::new(true);
    let source = MockSource::new(temp.path());

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir).library_loader(Arc::new(MockLoader)),
            |e| panic!("unexpected error: {e}"),
            || panic!("unexpected restart request"),
        )
        .await
        .unwrap();

    assert_eq!(source.locate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.download_calls.load(Ordering::SeqCst), 0);
    assert_eq!(runtime.startup_calls.load(Ordering::SeqCst), 1);
    assert!(!install_dir.exists());
    assert!(lifecycle.new_client().await.is_ok());
}

#[tokio::test]
async fn bundled_runtime_instance_failure_settles_the_attempt() {
    let temp = tempfile::tempdir().unwrap();
    let install_dir = temp.path().join("bundle");
    let runtime = MockRuntime::failing_instance();
    let source = MockSource::new(temp.path());

    let errors = AtomicUsize::new(0);

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir).library_loader(Arc::new(MockLoader)),
            |e| {
                assert!(matches!(
                    e,
                    CefError::Engine(cefkit_engine::Error::InstanceUnavailable)
                ));
                errors.fetch_add(1, Ordering::SeqCst);
            },
            || panic!("unexpected restart request"),
        )
        .await
        .unwrap();

    // The native side already started once; no install pipeline and no
    // second startup.
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(runtime.startup_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.locate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.download_calls.load(Ordering::SeqCst), 0);

    match lifecycle.new_client().await {
        Err(CefError::Init(cause)) => {
            assert!(matches!(&*cause, CefError::Engine(_)));
        }
        Err(e) => panic!("expected Init error, got {e}"),
        Ok(_) => panic!("expected Init error, got a client"),
    }
}

#[tokio::test]
async fn unwipeable_install_path_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    // The install path is occupied by a plain file, so the wipe of the
    // partial install cannot succeed.
    let install_dir = temp.path().join("bundle");
    std::fs::write(&install_dir, b"not a directory").unwrap();

    let runtime = MockRuntime::new(true);
    let source = MockSource::new(temp.path());

    let errors = AtomicUsize::new(0);

    let lifecycle = Coordinator::new();
    lifecycle
        .init(
            bootstrap(&runtime, &source, &install_dir),
            |e| {
                assert!(matches!(e, CefError::InstallationDirectory));
                errors.fetch_add(1, Ordering::SeqCst);
            },
            || {},
        )
        .await
        .unwrap();

    assert_eq!(errors.load(Ordering::SeqCst), 1);
    // Nothing was located or downloaded over the unusable path.
    assert_eq!(source.locate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.download_calls.load(Ordering::SeqCst), 0);
}

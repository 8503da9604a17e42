//! Engine startup against an installed bundle.

use std::path::Path;
use std::sync::Arc;

use cefkit_platform::Os;

use crate::error::{Error, Result};
use crate::runtime::{Engine, EngineRuntime, LibraryLoad};
use crate::settings::Settings;

/// Load the native libraries through `loader` and start the engine.
///
/// Unset paths in `settings` default to locations inside the install
/// directory. On macOS the bundle locations are additionally passed as
/// command-line arguments, which the native loader requires.
pub fn initialize(
    runtime: &Arc<dyn EngineRuntime>,
    loader: Arc<dyn LibraryLoad>,
    install_dir: &Path,
    args: &[String],
    mut settings: Settings,
    os: Os,
) -> Result<Arc<dyn Engine>> {
    runtime.set_library_loader(loader.clone());

    load_base_libraries(loader.as_ref(), args);

    if settings.locales_dir_path.is_none() {
        settings.locales_dir_path = Some(install_dir.join("locales"));
    }
    if settings.resources_dir_path.is_none() {
        settings.resources_dir_path = Some(install_dir.to_path_buf());
    }
    if settings.browser_subprocess_path.is_none() {
        settings.browser_subprocess_path = Some(install_dir.join("jcef_helper"));
    }
    if os.is_macos() {
        settings.browser_subprocess_path = Some(Os::browser_path(install_dir).into());
    }

    let args = os.fixed_args(install_dir, args);
    if !runtime.startup(&args) {
        return Err(Error::Startup);
    }
    loader.load("libcef");

    match runtime.existing_instance() {
        Some(engine) => Ok(engine),
        None => runtime.instance(&settings),
    }
}

/// Fast path for hosts that already ship the engine libraries on the ambient
/// search path (a bundled runtime).
///
/// `None` means the fast path does not apply (a required library is missing
/// or startup refused) and the regular install pipeline should run. Once
/// startup has succeeded the attempt is binding: an instance-creation failure
/// is returned as `Some(Err(..))` instead of falling back to an install,
/// which would start the native side a second time.
pub fn initialize_from_runtime(
    runtime: &Arc<dyn EngineRuntime>,
    loader: Arc<dyn LibraryLoad>,
    args: &[String],
    settings: Settings,
) -> Option<Result<Arc<dyn Engine>>> {
    if !loader.load("jawt") {
        return None;
    }
    if needs_gpu_libraries(args) {
        loader.load("EGL");
        loader.load("GLESv2");
        loader.load("vk_swiftshader");
    }
    if !loader.load("libcef") && !loader.load("cef") && !loader.load("jcef") {
        return None;
    }

    runtime.set_library_loader(loader);
    if !runtime.startup(args) {
        return None;
    }

    Some(match runtime.existing_instance() {
        Some(engine) => Ok(engine),
        None => runtime.instance(&settings),
    })
}

fn load_base_libraries(loader: &dyn LibraryLoad, args: &[String]) {
    if !loader.load("jawt") {
        tracing::warn!("could not load 'jawt' library");
    }
    if needs_gpu_libraries(args) {
        if !loader.load("EGL") {
            tracing::warn!("could not load 'EGL' library");
        }
        if !loader.load("GLESv2") {
            tracing::warn!("could not load 'GLESv2' library");
        }
    }
}

fn needs_gpu_libraries(args: &[String]) -> bool {
    !args.iter().any(|arg| arg.eq_ignore_ascii_case("--disable-gpu"))
}

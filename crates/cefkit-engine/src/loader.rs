//! Shared-library loading with per-platform name fallbacks.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cefkit_platform::Os;
use libloading::Library;

use crate::runtime::LibraryLoad;

/// Loads native libraries by bare name, trying the naming variants and search
/// locations a bundle may use. Loaded libraries are kept alive for the
/// loader's lifetime.
///
/// Candidate names are `{name, name+ext, libname, libname+ext}`, tried first
/// inside the install directory, then in each extra search path, and finally
/// through the system's default lookup.
pub struct LibraryLoader {
    install_dir: PathBuf,
    search_paths: Vec<PathBuf>,
    os: Os,
    loaded: Mutex<Vec<Library>>,
}

impl LibraryLoader {
    pub fn new(install_dir: impl Into<PathBuf>, os: Os) -> Self {
        Self {
            install_dir: install_dir.into(),
            search_paths: library_path_dirs(os),
            os,
            loaded: Mutex::new(Vec::new()),
        }
    }

    fn candidates(&self, name: &str) -> [String; 4] {
        let ext = self.os.library_extension();
        [
            name.to_string(),
            format!("{name}{ext}"),
            format!("lib{name}"),
            format!("lib{name}{ext}"),
        ]
    }

    fn try_load(&self, path: &Path) -> bool {
        if !path.exists() {
            return false;
        }
        match unsafe { Library::new(path) } {
            Ok(library) => {
                tracing::debug!(path = %path.display(), "loaded library");
                self.loaded.lock().unwrap().push(library);
                true
            }
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "library candidate failed");
                false
            }
        }
    }

    /// Load `name`, returning whether any candidate succeeded.
    pub fn load(&self, name: &str) -> bool {
        let candidates = self.candidates(name);

        for candidate in &candidates {
            if self.try_load(&self.install_dir.join(candidate)) {
                return true;
            }
        }

        for dir in &self.search_paths {
            for candidate in &candidates {
                if self.try_load(&dir.join(candidate)) {
                    return true;
                }
            }
        }

        // Fall back to the system's own search order.
        for candidate in &candidates {
            if let Ok(library) = unsafe { Library::new(candidate) } {
                tracing::debug!(name = candidate, "loaded library via system lookup");
                self.loaded.lock().unwrap().push(library);
                return true;
            }
        }

        false
    }
}

impl LibraryLoad for LibraryLoader {
    fn load(&self, name: &str) -> bool {
        LibraryLoader::load(self, name)
    }
}

/// Directories from the platform's library path environment variable.
fn library_path_dirs(os: Os) -> Vec<PathBuf> {
    let var = match os {
        Os::Linux => "LD_LIBRARY_PATH",
        Os::MacOs => "DYLD_LIBRARY_PATH",
        Os::Windows => "PATH",
    };
    std::env::var_os(var)
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default()
}

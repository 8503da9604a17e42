//! Host platform resolution.
//!
//! Maps raw OS/architecture strings onto the closed set of platforms the
//! engine publishes native bundles for. The host platform is resolved once
//! and cached process-wide.

use once_cell::sync::OnceCell;
use sysinfo::System;

mod arch;
mod error;
mod os;

pub use arch::Arch;
pub use error::{Error, Result};
pub use os::Os;

/// A supported (OS, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

static CURRENT: OnceCell<Platform> = OnceCell::new();

impl Platform {
    /// Resolve raw OS/arch strings against the alias tables.
    ///
    /// The first matching family wins, in the fixed order of [`Os::ALL`] and
    /// [`Arch::ALL`].
    pub fn resolve(os_name: &str, arch_name: &str) -> Result<Self> {
        let os = Os::ALL.iter().find(|os| os.matches(os_name)).copied();
        let arch = Arch::ALL.iter().find(|a| a.matches(arch_name)).copied();

        match (os, arch) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(Error::Unsupported {
                os: Some(os_name.to_string()),
                arch: Some(arch_name.to_string()),
            }),
        }
    }

    /// Resolve the host platform, cached after the first success.
    pub fn current() -> Result<Self> {
        CURRENT
            .get_or_try_init(|| {
                let os_name = System::name();
                let arch_name = System::cpu_arch();

                let os = os_name
                    .as_deref()
                    .and_then(|name| Os::ALL.iter().find(|os| os.matches(name)).copied());
                let arch = Arch::ALL.iter().find(|a| a.matches(&arch_name)).copied();

                match (os, arch) {
                    (Some(os), Some(arch)) => Ok(Self { os, arch }),
                    _ => Err(Error::Unsupported {
                        os: os_name,
                        arch: Some(arch_name),
                    }),
                }
            })
            .copied()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.os, self.arch)
    }
}

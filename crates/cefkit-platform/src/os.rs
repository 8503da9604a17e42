//! Operating system family matching.

use std::path::Path;

/// Operating system families the engine ships bundles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOs,
    Linux,
    Windows,
}

impl Os {
    /// Matching order is significant: macOS first, then Linux, then Windows.
    pub const ALL: [Os; 3] = [Os::MacOs, Os::Linux, Os::Windows];

    /// Name fragments a raw OS string is matched against. The same fragments
    /// are used to filter candidate package URLs.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Os::MacOs => &["mac", "darwin", "osx"],
            Os::Linux => &["linux"],
            Os::Windows => &["win", "windows"],
        }
    }

    /// Case-insensitive prefix or exact-alias match.
    pub fn matches(self, os_name: &str) -> bool {
        let lower = os_name.to_lowercase();
        self.aliases()
            .iter()
            .any(|alias| lower.starts_with(alias) || lower == *alias)
    }

    /// Platform extension for shared libraries.
    pub fn library_extension(self) -> &'static str {
        match self {
            Os::MacOs => ".dylib",
            Os::Linux => ".so",
            Os::Windows => ".dll",
        }
    }

    pub fn is_macos(self) -> bool {
        self == Os::MacOs
    }

    pub fn is_linux(self) -> bool {
        self == Os::Linux
    }

    pub fn is_windows(self) -> bool {
        self == Os::Windows
    }

    /// Path of the Chromium framework bundle inside the install directory
    /// (macOS layout).
    pub fn framework_path(install_dir: &Path) -> String {
        format!(
            "{}/Chromium Embedded Framework.framework",
            install_dir.display()
        )
    }

    /// Path of the helper app bundle inside the install directory (macOS
    /// layout).
    pub fn main_bundle_path(install_dir: &Path) -> String {
        format!("{}/jcef Helper.app", install_dir.display())
    }

    /// Path of the browser sub-process executable inside the helper bundle
    /// (macOS layout).
    pub fn browser_path(install_dir: &Path) -> String {
        format!(
            "{}/jcef Helper.app/Contents/MacOS/jcef Helper",
            install_dir.display()
        )
    }

    /// The macOS native loader only accepts bundle locations as process
    /// arguments, not settings fields, so they are prepended here. Other
    /// platforms pass the arguments through untouched.
    pub fn fixed_args(self, install_dir: &Path, args: &[String]) -> Vec<String> {
        match self {
            Os::MacOs => {
                let mut fixed = Vec::with_capacity(args.len() + 3);
                fixed.push(format!(
                    "--browser-subprocess-path={}",
                    Self::browser_path(install_dir)
                ));
                fixed.push(format!(
                    "--main-bundle-path={}",
                    Self::main_bundle_path(install_dir)
                ));
                fixed.push(format!(
                    "--framework-dir-path={}",
                    Self::framework_path(install_dir)
                ));
                fixed.extend_from_slice(args);
                fixed
            }
            Os::Linux | Os::Windows => args.to_vec(),
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Os::MacOs => "MacOS",
            Os::Linux => "Linux",
            Os::Windows => "Windows",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_names() {
        assert!(Os::MacOs.matches("Mac OS X"));
        assert!(Os::MacOs.matches("darwin"));
        assert!(Os::Linux.matches("Linux"));
        assert!(Os::Windows.matches("Windows 11"));
        assert!(!Os::Windows.matches("Linux"));
    }

    #[test]
    fn macos_wins_over_windows_for_darwin() {
        let matched = Os::ALL.iter().find(|os| os.matches("Darwin")).copied();
        assert_eq!(matched, Some(Os::MacOs));
    }

    #[test]
    fn fixed_args_prepend_bundle_paths_on_macos() {
        let args = vec!["--disable-gpu".to_string()];
        let fixed = Os::MacOs.fixed_args(Path::new("/opt/cef"), &args);
        assert_eq!(fixed.len(), 4);
        assert!(fixed[0].starts_with("--browser-subprocess-path="));
        assert!(fixed[1].starts_with("--main-bundle-path="));
        assert!(fixed[2].starts_with("--framework-dir-path="));
        assert_eq!(fixed[3], "--disable-gpu");
    }

    #[test]
    fn fixed_args_untouched_elsewhere() {
        let args = vec!["--disable-gpu".to_string()];
        assert_eq!(Os::Linux.fixed_args(Path::new("/opt/cef"), &args), args);
    }
}

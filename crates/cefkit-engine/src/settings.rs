//! Engine configuration passed to the native runtime at instance creation.

use std::path::PathBuf;

/// Minimum severity written to the engine's own log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSeverity {
    #[default]
    Default,
    Verbose,
    Info,
    Warning,
    Error,
    Fatal,
    Disable,
}

/// Engine-level options. All paths default to locations inside the install
/// directory when left unset.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// On-disk cache location. Empty means in-memory caches and no persisted
    /// local storage.
    pub cache_path: Option<PathBuf>,

    /// Opaque RGB background for accelerated content; white when unset.
    pub background_color: Option<u32>,

    /// Separate executable launched for sub-processes.
    pub browser_subprocess_path: Option<PathBuf>,

    /// Disables configuration of the browser process through command-line
    /// arguments.
    pub command_line_args_disabled: bool,

    pub cookieable_schemes_exclude_defaults: bool,
    pub cookieable_schemes_list: Option<String>,

    /// Custom V8 flags.
    pub javascript_flags: Option<String>,

    /// Locale passed to the renderer; "en-US" when unset, ignored on Linux
    /// where environment variables take precedence.
    pub locale: Option<String>,

    /// Locales directory; defaults to `<install_dir>/locales`.
    pub locales_dir_path: Option<PathBuf>,

    /// Debug log file; "debug.log" in the application directory when unset.
    pub log_file: Option<PathBuf>,

    pub log_severity: LogSeverity,

    /// Disables loading of resource/locale pack files.
    pub pack_loading_disabled: bool,

    /// Persist session cookies through the global cookie manager. Requires
    /// `cache_path`.
    pub persist_session_cookies: bool,

    /// Port for remote debugging over HTTP, valid between 1024 and 65535.
    pub remote_debugging_port: Option<u16>,

    /// Resources directory; defaults to the install directory.
    pub resources_dir_path: Option<PathBuf>,

    /// Stack trace depth captured for uncaught exceptions; 0 disables capture.
    pub uncaught_exception_stack_size: Option<u32>,

    pub user_agent: Option<String>,
    pub user_agent_product: Option<String>,

    /// Enables windowless (off-screen) rendering support.
    pub windowless_rendering_enabled: bool,

    pub no_sandbox: bool,
}

use std::path::PathBuf;
use std::time::Duration;

/// Default session name used when `--session` is not given.
pub const DEFAULT_SESSION: &str = "default";

/// Fixed viewport applied to every spawned browser.
pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 800;

/// Fixed desktop user-agent applied to every spawned browser (Chrome on macOS).
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Interval between CDP readiness probes after a launch.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum number of readiness probes before a launch is declared dead (~15s).
pub const READY_POLL_ATTEMPTS: u32 = 30;

/// Pause after readiness so the initial load gets past its earliest paint.
pub const LAUNCH_SETTLE: Duration = Duration::from_secs(1);

/// Pause before reading storage during a profile save, letting pending writes flush.
pub const SAVE_SETTLE: Duration = Duration::from_millis(500);

/// Budget for attaching to a recorded session before it is treated as dead.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for selector waits inside `exec` batches.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options controlling how a new browser process is spawned.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headed: bool,
    /// Explicit executable path; when `None` the launcher probes for one.
    pub browser_path: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headed: false,
            browser_path: None,
        }
    }
}

impl LaunchOptions {
    pub fn headed(mut self, headed: bool) -> Self {
        self.headed = headed;
        self
    }
}

/// Root of all scratch state: session records and spawned-browser data dirs.
fn state_root() -> PathBuf {
    std::env::temp_dir().join("pagepilot")
}

/// Directory holding one JSON record per session name.
pub fn sessions_dir() -> PathBuf {
    state_root().join("sessions")
}

/// Per-session user-data directory for a spawned browser.
pub fn browser_data_dir(session: &str) -> PathBuf {
    state_root().join("data").join(session)
}

/// Directory holding one profile file per normalized domain.
pub fn profiles_dir() -> PathBuf {
    PathBuf::from(".pagepilot-profiles")
}

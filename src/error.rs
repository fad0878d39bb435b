use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No session named '{0}'. Run `pagepilot open <url>` or `pagepilot connect <cdp-url>` first")]
    NoSession(String),

    #[error("Session '{session}' is not reachable on port {port}; the record was discarded. Run `pagepilot open <url>` to start a fresh session")]
    SessionUnreachable { session: String, port: u16 },

    #[error("No page to act on in session '{0}'")]
    NoPages(String),

    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    #[error("Browser did not become ready on port {port} within {waited_secs}s")]
    LaunchTimeout { port: u16, waited_secs: u64 },

    #[error("No Chromium-based browser found. {0}")]
    BrowserNotFound(String),

    #[error("Navigation failed: {0}")]
    NavigationError(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Could not {action} '{selector}': {cause}")]
    ActionFailed {
        action: &'static str,
        selector: String,
        cause: String,
    },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("JavaScript error: {0}")]
    JsError(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotError(String),

    #[error("Invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },

    #[error("Unknown instruction '{verb}'. Known instructions: goto, click, fill, press, wait, eval")]
    UnknownInstruction { verb: String },

    #[error("CDP error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Browser executable discovery.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Known Chromium-based executable names to search for on PATH.
/// All of these speak CDP.
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "msedge",
    "microsoft-edge",
    "brave-browser",
    "brave",
];

#[cfg(target_os = "macos")]
const PLATFORM_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

#[cfg(target_os = "windows")]
const PLATFORM_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PLATFORM_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

/// Locate a Chromium-based browser.
///
/// Checks, in order: an explicit override, the `CHROME` environment
/// variable, platform install paths, then executable names on PATH. Install
/// paths come before PATH because PATH can carry broken wrapper scripts.
pub fn find_browser(explicit: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(Error::BrowserNotFound(format!(
            "configured path does not exist: {}",
            path.display()
        )));
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
    }

    for path in PLATFORM_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    Err(Error::BrowserNotFound(
        "Install Google Chrome or Chromium, or point the CHROME environment variable at one"
            .to_string(),
    ))
}

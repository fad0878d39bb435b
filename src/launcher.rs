use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::{
    self, LaunchOptions, CONNECT_TIMEOUT, DESKTOP_USER_AGENT, LAUNCH_SETTLE, READY_POLL_ATTEMPTS,
    READY_POLL_INTERVAL, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::connection::{self, Attachment};
use crate::detect;
use crate::error::{Error, Result};
use crate::profile::{self, normalize_domain, ProfileStore};
use crate::session::{SessionRecord, SessionStore};

/// Reserve a free TCP port from the OS ephemeral range.
pub fn free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

/// Launch a browser for `session` navigated to `url`, or redirect the one
/// already running under that name.
///
/// Reuse is decided by a real attach attempt, never by record presence
/// alone, which makes `open` idempotent: repeated calls against a live
/// session navigate it instead of spawning a second browser. A fresh launch
/// allocates a port, spawns a detached browser process, polls the CDP
/// endpoint until ready (no record is written if the budget is exhausted),
/// applies any saved profile for the target domain, and settles briefly so
/// the initial load gets past its earliest paint.
pub async fn launch(
    store: &SessionStore,
    profiles: &ProfileStore,
    session: &str,
    url: &str,
    opts: &LaunchOptions,
) -> Result<Attachment> {
    if store.read(session).is_some() {
        if let Ok(attachment) = connection::attach(store, session, CONNECT_TIMEOUT).await {
            info!(session, url, "reusing running session");
            attachment.active_page().await?.goto(url).await?;
            return Ok(attachment);
        }
        // A failed attach has already evicted the stale record.
    }

    let port = free_port()?;
    let domain = normalize_domain(url);
    let saved_profile = profiles.load(&domain);
    let executable = detect::find_browser(opts.browser_path.as_ref())?;

    info!(session, url, port, headed = opts.headed, "launching browser");
    spawn_browser(&executable, port, session, url, opts)?;
    wait_ready(port).await?;

    store.write(&SessionRecord::new(session, port, false))?;

    let attachment = connection::attach(store, session, CONNECT_TIMEOUT).await?;
    if let Some(saved) = saved_profile {
        info!(session, domain, "applying saved profile");
        profile::apply(&attachment, &saved).await?;
    }

    tokio::time::sleep(LAUNCH_SETTLE).await;
    Ok(attachment)
}

/// Spawn the browser as a detached process. The child handle is dropped
/// without waiting: the browser owns its own lifetime from here and exits
/// when its last page closes, so closing the page shuts the session down.
fn spawn_browser(
    executable: &Path,
    port: u16,
    session: &str,
    url: &str,
    opts: &LaunchOptions,
) -> Result<()> {
    let data_dir = config::browser_data_dir(session);
    std::fs::create_dir_all(&data_dir)?;

    let mut cmd = Command::new(executable);
    cmd.arg(format!("--remote-debugging-port={port}"))
        .arg(format!("--user-data-dir={}", data_dir.display()))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg(format!("--window-size={VIEWPORT_WIDTH},{VIEWPORT_HEIGHT}"))
        .arg(format!("--user-agent={DESKTOP_USER_AGENT}"));
    if !opts.headed {
        cmd.arg("--headless=new");
    }
    cmd.arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let child = cmd
        .spawn()
        .map_err(|e| Error::LaunchError(format!("{}: {e}", executable.display())))?;
    debug!(pid = child.id(), port, "browser process spawned");
    drop(child);
    Ok(())
}

/// Poll the CDP version endpoint until it answers or the budget runs out.
async fn wait_ready(port: u16) -> Result<()> {
    for attempt in 0..READY_POLL_ATTEMPTS {
        if connection::probe(port).await {
            debug!(port, attempt, "CDP endpoint ready");
            return Ok(());
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
    Err(Error::LaunchTimeout {
        port,
        waited_secs: (READY_POLL_INTERVAL * READY_POLL_ATTEMPTS).as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_port_returns_a_bindable_port() {
        let port = free_port().unwrap();
        assert!(port > 0);
        // The port is released and can be bound again.
        TcpListener::bind(("127.0.0.1", port)).unwrap();
    }

    #[test]
    fn free_port_hands_out_distinct_ports_while_held() {
        let a = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let b = free_port().unwrap();
        assert_ne!(a.local_addr().unwrap().port(), b);
    }
}

use std::time::Duration;

use chromiumoxide::browser::Browser;
use chromiumoxide::handler::Handler;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};
use crate::page::Page;
use crate::session::SessionStore;

/// A live CDP attachment to a running browser.
///
/// The attachment owns the protocol connection, never the browser process:
/// dropping it aborts the event-drain task and closes the websocket on every
/// exit path, leaving the browser running. Only [`Attachment::close_browser`]
/// terminates the process, and only the `close` command calls it.
#[derive(Debug)]
pub struct Attachment {
    browser: Browser,
    session: String,
    handler_task: JoinHandle<()>,
}

impl Attachment {
    /// All open pages, unfiltered.
    pub async fn pages(&self) -> Result<Vec<Page>> {
        let pages = self.browser.pages().await.map_err(Error::CdpError)?;
        Ok(pages.into_iter().map(Page::new).collect())
    }

    /// The page commands act on: the most-recently-created page that is not
    /// a devtools or extension-internal target.
    pub async fn active_page(&self) -> Result<Page> {
        let pages = self.browser.pages().await.map_err(Error::CdpError)?;
        let mut last = None;
        for page in pages {
            let url = page.url().await.ok().flatten().unwrap_or_default();
            if url.starts_with("devtools://") || url.starts_with("chrome-extension://") {
                continue;
            }
            last = Some(page);
        }
        last.map(Page::new)
            .ok_or_else(|| Error::NoPages(self.session.clone()))
    }

    /// Ask the browser to shut itself down. Used by `close` for sessions
    /// this tool spawned.
    pub async fn close_browser(&mut self) -> Result<()> {
        self.browser.close().await.map_err(Error::CdpError)?;
        Ok(())
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// Fetch the browser-level websocket debugger URL from the CDP HTTP endpoint.
async fn fetch_ws_url(port: u16) -> Option<String> {
    let url = format!("http://127.0.0.1:{port}/json/version");
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(2))
        .build()
        .ok()?;
    let resp = client.get(&url).send().await.ok()?;
    let info: serde_json::Value = resp.json().await.ok()?;
    info.get("webSocketDebuggerUrl")
        .and_then(|v| v.as_str())
        .map(String::from)
}

/// Whether a CDP endpoint answers on the given port.
pub async fn probe(port: u16) -> bool {
    fetch_ws_url(port).await.is_some()
}

async fn try_attach(port: u16) -> Option<(Browser, Handler)> {
    let ws = fetch_ws_url(port).await?;
    Browser::connect(&ws).await.ok()
}

/// Attach to the browser recorded for `session`.
///
/// The websocket discovery and connect are raced against `timeout`; an
/// elapsed timer and a failed attach are handled identically (the losing
/// connect attempt is abandoned, not cancelled). Any failure evicts the
/// record so the next `open` starts fresh instead of retrying a dead port.
pub async fn attach(store: &SessionStore, session: &str, timeout: Duration) -> Result<Attachment> {
    let record = store
        .read(session)
        .ok_or_else(|| Error::NoSession(session.to_string()))?;

    match tokio::time::timeout(timeout, try_attach(record.port)).await {
        Ok(Some((browser, mut handler))) => {
            debug!(session, port = record.port, "attached to browser");
            let handler_task = tokio::spawn(async move {
                while let Some(_event) = handler.next().await {}
            });
            Ok(Attachment {
                browser,
                session: session.to_string(),
                handler_task,
            })
        }
        _ => {
            debug!(session, port = record.port, "attach failed, evicting record");
            store.clear(session)?;
            Err(Error::SessionUnreachable {
                session: session.to_string(),
                port: record.port,
            })
        }
    }
}

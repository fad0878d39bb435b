use tracing::info;

use crate::config::CONNECT_TIMEOUT;
use crate::connection;
use crate::error::{Error, Result};
use crate::session::SessionStore;

/// Close a session. Sessions this tool spawned get a best-effort protocol
/// shutdown; external sessions are only disconnected. The record is cleared
/// unconditionally, so a following `connect` fails with the no-session error.
pub async fn run(store: &SessionStore, session: &str) -> Result<()> {
    let record = store
        .read(session)
        .ok_or_else(|| Error::NoSession(session.to_string()))?;

    match connection::attach(store, session, CONNECT_TIMEOUT).await {
        Ok(mut attachment) => {
            if !record.external {
                if let Err(err) = attachment.close_browser().await {
                    info!(session, error = %err, "browser did not acknowledge shutdown");
                }
            }
            // Dropping the attachment releases the connection either way.
        }
        Err(_) => {
            // Already dead; the failed attach evicted the record.
        }
    }

    store.clear(session)?;
    println!("Session '{session}' closed");
    Ok(())
}

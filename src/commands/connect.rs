use crate::config::CONNECT_TIMEOUT;
use crate::connection;
use crate::error::{Error, Result};
use crate::session::{SessionRecord, SessionStore};

/// Register an operator-launched browser as a named session. Only the port
/// is recorded; the registration is verified by a real attach, which evicts
/// the record again if the endpoint does not answer.
pub async fn run(store: &SessionStore, session: &str, cdp_url: &str) -> Result<()> {
    let port = parse_port(cdp_url)?;
    store.write(&SessionRecord::new(session, port, true))?;

    let attachment = connection::attach(store, session, CONNECT_TIMEOUT).await?;
    let pages = attachment.pages().await?.len();
    println!("Registered external browser on port {port} as session '{session}' ({pages} pages)");
    Ok(())
}

fn parse_port(cdp_url: &str) -> Result<u16> {
    let invalid = || Error::InvalidArgument {
        what: "CDP URL",
        value: format!("{cdp_url} (expected http://host:port)"),
    };
    let parsed = url::Url::parse(cdp_url).map_err(|_| invalid())?;
    if parsed.scheme() != "http" {
        return Err(invalid());
    }
    parsed.port().ok_or_else(invalid)
}

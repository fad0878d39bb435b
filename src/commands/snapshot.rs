use crate::config::CONNECT_TIMEOUT;
use crate::connection;
use crate::error::Result;
use crate::session::SessionStore;
use crate::snapshot;

pub async fn run(store: &SessionStore, session: &str) -> Result<()> {
    let attachment = connection::attach(store, session, CONNECT_TIMEOUT).await?;
    let page = attachment.active_page().await?;
    let observation = snapshot::observe(&page).await?;
    print!("{}", snapshot::build_report(&observation));
    Ok(())
}

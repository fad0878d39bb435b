use crate::config::CONNECT_TIMEOUT;
use crate::connection;
use crate::error::Result;
use crate::exec as instructions;
use crate::session::SessionStore;
use crate::snapshot;

pub async fn run(store: &SessionStore, session: &str, code: &str) -> Result<()> {
    // Parse before attaching so a bad batch has no side effects.
    let batch = instructions::parse(code)?;

    let attachment = connection::attach(store, session, CONNECT_TIMEOUT).await?;
    let page = attachment.active_page().await?;
    instructions::run(&page, &batch).await?;

    let observation = snapshot::observe(&page).await?;
    print!("{}", snapshot::build_report(&observation));
    Ok(())
}

use tracing::info;

use crate::config::LaunchOptions;
use crate::error::Result;
use crate::launcher;
use crate::profile::ProfileStore;
use crate::session::SessionStore;
use crate::snapshot;

pub async fn run(store: &SessionStore, session: &str, url: &str, headed: bool) -> Result<()> {
    let profiles = ProfileStore::open_default();
    let opts = LaunchOptions::default().headed(headed);

    let attachment = launcher::launch(store, &profiles, session, url, &opts).await?;
    let page = attachment.active_page().await?;
    let observation = snapshot::observe(&page).await?;
    print!("{}", snapshot::build_report(&observation));

    info!(session, url, "session ready");
    Ok(())
}

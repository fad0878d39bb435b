use tracing::info;

use crate::config::CONNECT_TIMEOUT;
use crate::connection;
use crate::error::{Error, Result};
use crate::profile::{self, normalize_domain, ProfileStore};
use crate::session::SessionStore;

pub async fn run(store: &SessionStore, session: &str, target: &str) -> Result<()> {
    let domain = normalize_domain(target);
    if domain.is_empty() {
        return Err(Error::InvalidArgument {
            what: "domain",
            value: target.to_string(),
        });
    }

    let attachment = connection::attach(store, session, CONNECT_TIMEOUT).await?;
    let captured = profile::capture(&attachment).await?;

    let profiles = ProfileStore::open_default();
    profiles.save(&domain, &captured)?;

    info!(session, domain, "profile saved");
    println!(
        "Saved profile for {domain}: {} cookies, {} origins with local storage",
        captured.cookies.len(),
        captured.origins.len()
    );
    Ok(())
}

mod close;
mod connect;
mod exec;
mod open;
mod save;
mod screenshot;
mod snapshot;

use crate::cli::Command;
use crate::error::Result;
use crate::session::SessionStore;

pub async fn dispatch(command: Command, session: &str) -> Result<()> {
    let store = SessionStore::open_default();
    match command {
        Command::Open { url, headed } => open::run(&store, session, &url, headed).await,
        Command::Connect { cdp_url } => connect::run(&store, session, &cdp_url).await,
        Command::Save { target } => save::run(&store, session, &target).await,
        Command::Exec { code } => exec::run(&store, session, &code.join(" ")).await,
        Command::Snapshot => snapshot::run(&store, session).await,
        Command::Screenshot => screenshot::run(&store, session).await,
        Command::Close => close::run(&store, session).await,
    }
}

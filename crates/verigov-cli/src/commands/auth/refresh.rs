//! Refresh command implementation.

use anyhow::{Result, bail};
use clap::Args;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    if !session.client().refresh_session().await {
        bail!("Session could not be renewed. Run 'verigov auth login' again.");
    }

    output::success("Session refreshed");
    Ok(())
}

//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;

    session
        .client()
        .logout()
        .context("Failed to remove session")?;

    output::success("Logged out");
    Ok(())
}

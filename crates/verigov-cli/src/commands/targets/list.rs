//! List targets command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    let targets = session
        .client()
        .list_targets()
        .await
        .context("Failed to list targets")?;

    if targets.is_empty() {
        eprintln!("{}", "No targets found.".dimmed());
        return Ok(());
    }

    // One JSON object per line.
    for target in &targets {
        output::print(target, args.pretty)?;
    }

    Ok(())
}

//! Check command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use verigov_core::models::TargetId;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Target to check
    pub target_id: TargetId,

    /// Ask the backend to queue the check
    #[arg(long = "async")]
    pub queue: bool,
}

pub async fn run(args: CheckArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    eprintln!("{}", format!("Checking target {}...", args.target_id).dimmed());

    let client = session.client();
    let outcome = if args.queue {
        client.run_check_async(args.target_id).await
    } else {
        client.run_check(args.target_id).await
    }
    .context("Failed to run check")?;

    if outcome.is_queued() {
        output::success("Check queued");
        if let Some(job_id) = &outcome.job_id {
            output::field("Job", job_id);
        }
    } else {
        output::success("Check completed");
        output::json(&outcome)?;
    }

    Ok(())
}

//! Job command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct JobArgs {
    /// Job identifier returned by `check --async`
    pub job_id: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: JobArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    let job = session
        .client()
        .job(&args.job_id)
        .await
        .context("Failed to fetch job")?;

    output::print(&job, args.pretty)
}

//! Report command implementation.

use anyhow::{Context, Result};
use clap::Args;

use verigov_core::models::TargetId;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Target whose latest report to show
    pub target_id: TargetId,

    /// Pretty-print the report summary only
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ReportArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    let report = session
        .client()
        .latest_report(args.target_id)
        .await
        .context("Failed to fetch report")?;

    if args.pretty {
        output::json_pretty(&report.summary_json)
    } else {
        output::json(&report)
    }
}

//! Health command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct HealthArgs {}

pub async fn run(_args: HealthArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;

    let health = session
        .client()
        .health()
        .await
        .context("Backend unreachable")?;

    output::field("API", &backend.api_url);
    output::field("Status", &health.status);
    Ok(())
}

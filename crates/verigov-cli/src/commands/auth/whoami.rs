//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    let me = session
        .client()
        .me()
        .await
        .context("Failed to fetch profile")?;

    if args.json {
        return output::json(&me);
    }

    output::field("Email", &me.email);
    output::field("User", &me.id.to_string());
    output::field("Tenant", &me.tenant_id.to_string());
    output::field("Role", &me.role);

    Ok(())
}

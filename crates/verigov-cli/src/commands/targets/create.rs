//! Create target command implementation.

use anyhow::{Context, Result};
use clap::Args;

use verigov_core::models::NewTarget;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// CNPJ, formatted or digits only
    #[arg(long)]
    pub document: String,

    /// Company name, used as a hint by the backend
    #[arg(long)]
    pub name_hint: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: CreateArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    session.require_login()?;

    let mut target = NewTarget::cnpj(&args.document);
    if let Some(hint) = &args.name_hint {
        target = target.with_name_hint(hint);
    }

    let created = session
        .client()
        .create_target(&target)
        .await
        .context("Failed to create target")?;

    output::success(&format!("Target {} created", created.id));
    output::print(&created, args.pretty)
}

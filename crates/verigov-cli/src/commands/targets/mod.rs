//! Target subcommands.

mod create;
mod list;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::BackendArgs;

#[derive(Args, Debug)]
pub struct TargetsCommand {
    #[command(subcommand)]
    pub command: TargetsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TargetsSubcommand {
    /// List the tenant's targets
    List(list::ListArgs),

    /// Register a company by CNPJ
    Create(create::CreateArgs),
}

pub async fn handle(cmd: TargetsCommand, backend: &BackendArgs) -> Result<()> {
    match cmd.command {
        TargetsSubcommand::List(args) => list::run(args, backend).await,
        TargetsSubcommand::Create(args) => create::run(args, backend).await,
    }
}

//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use verigov_core::Registration;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "VERIGOV_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Name of the tenant to create
    #[arg(long)]
    pub tenant_name: String,
}

pub async fn run(args: RegisterArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    let registration = Registration::new(&args.email, &args.password, &args.tenant_name);

    eprintln!("{}", "Registering...".dimmed());

    session
        .client()
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::success("Account registered");
    output::field("Email", &args.email);
    output::field("Tenant", &args.tenant_name);

    Ok(())
}

//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use verigov_core::Credentials;

use crate::cli::BackendArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "VERIGOV_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, backend: &BackendArgs) -> Result<()> {
    let session = CliSession::open(backend)?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    session
        .client()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    output::field("Email", &args.email);
    output::field("API", &backend.api_url);
    output::field("Session file", &session.token_file().display().to_string());

    Ok(())
}

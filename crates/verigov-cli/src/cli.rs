//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use verigov_http::DEFAULT_API_URL;

use crate::commands::auth::AuthCommand;
use crate::commands::targets::TargetsCommand;
use crate::commands::{check, health, job, report};

/// Command-line client for the VeriGov compliance backend.
#[derive(Parser, Debug)]
#[command(name = "verigov")]
#[command(author, version = env!("VERIGOV_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub backend: BackendArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the backend lives and where the session is kept.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Backend base URL
    #[arg(long, global = true, env = "VERIGOV_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Session file (defaults to the platform data directory)
    #[arg(long, global = true, env = "VERIGOV_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management
    Auth(AuthCommand),

    /// Target management
    Targets(TargetsCommand),

    /// Run a compliance check on a target
    Check(check::CheckArgs),

    /// Show the latest report for a target
    Report(report::ReportArgs),

    /// Show the state of a queued check
    Job(job::JobArgs),

    /// Check backend liveness
    Health(health::HealthArgs),
}

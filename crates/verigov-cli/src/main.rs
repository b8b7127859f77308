//! verigov - command-line client for the VeriGov compliance backend.
//!
//! A thin wrapper over `verigov-http`. The session token pair is kept in a
//! file so that consecutive invocations share one login.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, check, health, job, report, targets};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &cli.backend).await,
        Commands::Targets(cmd) => targets::handle(cmd, &cli.backend).await,
        Commands::Check(args) => check::run(args, &cli.backend).await,
        Commands::Report(args) => report::run(args, &cli.backend).await,
        Commands::Job(args) => job::run(args, &cli.backend).await,
        Commands::Health(args) => health::run(args, &cli.backend).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs share stderr with status lines; stdout carries results only.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

//! pr-triage - report open pull requests from outside contributors
//!
//! Lists a repository's open pull requests whose authors belong to none of
//! the configured organizations, skipping bots, and optionally files them
//! on an organization project board.

mod commands;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::ReportArgs;

/// Report open pull requests from users outside the given organizations
#[derive(Parser, Debug)]
#[command(name = "pr-triage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    report: ReportArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    cli.report.execute().await
}

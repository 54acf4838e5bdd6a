//! Tiderisk - corpus-relative risk scoring CLI
//!
//! Turns detector output (debris label + confidence) into normalized
//! risk scores and tiers, judged against your own observation history.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tiderisk::cli;

fn main() -> Result<()> {
    // Parse first so --log-level can seed the filter; RUST_LOG still
    // wins when set.
    let cli = cli::Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(cli)
}

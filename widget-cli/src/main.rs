//! Binary crate for the `weather-widget` harness.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Playing the host shell against the on-disk cache
//! - Human-friendly row output

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod host;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run()
}

//! voltview - Telemetry Viewer
//!
//! Command-line front end for inspecting telemetry exports, extracting
//! dual-axis chart series and summarising time spent per value range.

mod cli;
mod commands;
mod table;

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over -v
    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli, &mut out)?;

    Ok(())
}

//! # neuroloop CLI
//!
//! Command-line driver for closed-loop spiking network demos. The
//! simulation core is caller-paced; this binary owns wall-clock pacing
//! and rendering.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod render;

use commands::NeuroloopCli;

fn main() {
    // Initialize logging with environment variable support
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let cli = NeuroloopCli::parse();

    if let Err(err) = cli.execute() {
        tracing::error!("Command failed: {}", err);
        std::process::exit(1);
    }
}

//! CLI command definitions

use clap::{Parser, Subcommand};

mod demo;

pub use demo::DemoArgs;

/// Top-level CLI for the neuroloop simulator
#[derive(Parser)]
#[command(
    name = "neuroloop",
    version,
    about = "Closed-loop spiking network simulator",
    long_about = "Drives a spiking neural network against an environment: \
observations become input spikes, output spikes become actions, and a goal \
function turns transitions into reward-modulated weight updates."
)]
pub struct NeuroloopCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the moving-dot screen demo
    Demo(DemoArgs),
}

impl NeuroloopCli {
    /// Execute the selected command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Demo(args) => demo::run(args),
        }
    }
}

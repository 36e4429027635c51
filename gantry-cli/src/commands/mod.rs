//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod check;
mod synth;

pub use synth::StackSelection;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize the deployment manifest
    Synth {
        /// Path to the context file
        #[arg(short, long, default_value = "gantry.json")]
        context: String,

        /// Which stack(s) to synthesize
        #[arg(long, value_enum, default_value = "all")]
        stack: StackSelection,

        /// Write the manifest to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate the parameter set and show derived identities
    Check {
        /// Path to the context file
        #[arg(short, long, default_value = "gantry.json")]
        context: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Synth {
            context,
            stack,
            output,
        } => synth::handle_synth(&context, stack, output.as_deref(), config),
        Commands::Check { context } => check::handle_check(&context, config),
    }
}

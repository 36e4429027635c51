//! Gantry CLI
//!
//! Command-line interface for synthesizing deployment manifests.

mod commands;
mod config;
mod context;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Deployment pipeline manifest synthesizer", long_about = None)]
struct Cli {
    /// Target account (overrides the context file)
    #[arg(long, env = "GANTRY_ACCOUNT")]
    account: Option<String>,

    /// Target region (overrides the context file)
    #[arg(long, env = "GANTRY_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry_assembler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        account: cli.account,
        region: cli.region,
    };

    handle_command(cli.command, &config)
}

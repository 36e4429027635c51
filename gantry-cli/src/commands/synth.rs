//! Synth command handler
//!
//! Constructs the selected stacks and writes the manifest JSON for the
//! provisioning engine.

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use colored::*;

use gantry_assembler::{PipelineAssembler, provision_environments};
use gantry_core::domain::params::DeployParams;
use gantry_core::dto::manifest::DeploymentManifest;

use crate::config::Config;
use crate::context;

/// Which stacks to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StackSelection {
    All,
    Network,
    Pipeline,
}

/// Synthesize and emit the deployment manifest
pub fn handle_synth(
    context_path: &str,
    selection: StackSelection,
    output: Option<&str>,
    config: &Config,
) -> Result<()> {
    let set = context::load_parameters(context_path, config)?;
    let params = DeployParams::from_set(&set).context("Invalid parameter set")?;

    let mut manifest = DeploymentManifest::new(&params.account, &params.region);

    if matches!(selection, StackSelection::All | StackSelection::Network) {
        let network = provision_environments(&params.microservice_name);
        manifest = manifest.with_stack(network.manifest());
    }
    if matches!(selection, StackSelection::All | StackSelection::Pipeline) {
        let pipeline = PipelineAssembler::new()
            .assemble_params(&params)
            .context("Pipeline assembly failed")?;
        manifest = manifest.with_stack(pipeline.manifest());
    }

    let json = serde_json::to_string_pretty(&manifest).context("Failed to encode manifest")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write manifest to {}", path))?;
            println!("{}", "✓ Manifest synthesized!".green().bold());
            println!("  Stacks: {}", manifest.stacks.len().to_string().cyan());
            println!("  Output: {}", path.bold());
        }
        None => println!("{}", json),
    }

    Ok(())
}

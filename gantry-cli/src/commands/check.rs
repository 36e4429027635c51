//! Check command handler
//!
//! Validates the parameter set without synthesizing anything, and shows
//! the identities the assembler would derive.

use anyhow::{Context as _, Result};
use colored::*;

use gantry_assembler::ResourceNames;
use gantry_core::domain::params::DeployParams;

use crate::config::Config;
use crate::context;

/// Validate the parameter set and print derived identities
pub fn handle_check(context_path: &str, config: &Config) -> Result<()> {
    let set = context::load_parameters(context_path, config)?;
    let params = DeployParams::from_set(&set).context("Invalid parameter set")?;

    let names = ResourceNames::derive(&params.microservice_name);

    println!("{}", "✓ Parameter set is valid!".green().bold());
    println!("  Microservice: {}", params.microservice_name.bold());
    println!("  Branch:       {}", params.branch_name.dimmed());
    println!(
        "  Target:       {}",
        format!("{} / {}", params.account, params.region).dimmed()
    );
    println!();
    println!("{}", "Derived identities:".bold());
    for identity in names.unique_identities() {
        println!("  {} {}", "▸".cyan(), identity);
    }

    Ok(())
}

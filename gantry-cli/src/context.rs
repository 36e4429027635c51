//! Context file loading
//!
//! Parameters are supplied through a JSON context file shaped like
//! `{"context": {"microservice_name": "...", ...}}`. Account/region
//! overrides from flags or environment win over file values.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use gantry_core::domain::params::ParameterSet;

use crate::config::Config;

/// On-disk context file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextFile {
    #[serde(default)]
    pub context: ParameterSet,
}

/// Load the parameter set from a context file and apply overrides
pub fn load_parameters(path: &str, config: &Config) -> Result<ParameterSet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file: {}", path))?;

    let file: ContextFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse context file: {}", path))?;

    let mut params = file.context;
    if let Some(account) = &config.account {
        params.insert("aws_account", account);
    }
    if let Some(region) = &config.region {
        params.insert("aws_region", region);
    }

    Ok(params)
}

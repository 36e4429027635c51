//! Gantry Assembler
//!
//! Turns a validated parameter set into the two deployment stacks: the
//! environment (network) stack and the pipeline stack.
//!
//! Construction is a single synchronous pass. Any configuration or
//! identity error aborts before a manifest is produced; there is no
//! partial output and no retry.

pub mod buildspec;
pub mod names;
pub mod pipeline;
pub mod provision;

pub use names::{NameRegistry, ResourceNames};
pub use pipeline::{PipelineAssembler, PipelineStack};
pub use provision::{NetworkStack, provision_environments};

use gantry_core::Result;
use gantry_core::domain::params::{DeployParams, ParameterSet};
use gantry_core::dto::manifest::DeploymentManifest;

/// Construct the full deployment manifest (network and pipeline stacks)
///
/// Convenience over [`provision_environments`] and [`PipelineAssembler`]
/// for callers that want both stacks in one document.
///
/// # Errors
/// Fails fast on the first missing/empty parameter or identity collision;
/// no stack is produced in that case.
pub fn synthesize(set: &ParameterSet) -> Result<DeploymentManifest> {
    let params = DeployParams::from_set(set)?;

    let network = provision_environments(&params.microservice_name);
    let pipeline = PipelineAssembler::new().assemble_params(&params)?;

    Ok(DeploymentManifest::new(&params.account, &params.region)
        .with_stack(network.manifest())
        .with_stack(pipeline.manifest()))
}

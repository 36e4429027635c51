//! Gantry Core
//!
//! Core types for the Gantry deployment-manifest engine.
//!
//! This crate contains:
//! - Domain types: parameter sets, environments, services, pipeline graphs
//! - DTOs: the manifest documents handed to the provisioning engine

pub mod domain;
pub mod dto;
pub mod error;

pub use error::{AssemblyError, Result};

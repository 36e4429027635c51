//! Environments and provisioned-resource handles
//!
//! An environment is one of the two isolated tracks a deployment runs in.
//! The provisioner creates concrete `Network` and `Cluster` resources; the
//! pipeline stack only ever sees `NetworkRef`/`ClusterRef` handles resolved
//! by name or id, so the two stacks can be deployed independently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvKind {
    NonProd,
    Prod,
}

impl EnvKind {
    /// Both environments, in provisioning order
    pub const ALL: [EnvKind; 2] = [EnvKind::NonProd, EnvKind::Prod];

    /// Stable label used in derived resource names
    pub fn label(self) -> &'static str {
        match self {
            EnvKind::NonProd => "nonprod",
            EnvKind::Prod => "prod",
        }
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An isolated network created by the environment provisioner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Stable lookup name
    pub name: String,
    pub env: EnvKind,
    /// Number of availability zones the address space spans
    pub availability_zones: u8,
}

/// A compute cluster bound to one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Stable lookup name
    pub name: String,
    pub env: EnvKind,
    /// Lookup name of the owning network
    pub network: String,
    /// Capacity provider the cluster schedules onto
    pub capacity_provider: String,
}

/// By-id handle to a network provisioned elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRef {
    pub vpc_id: String,
    pub security_group_id: String,
}

/// By-name handle to a cluster provisioned elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRef {
    pub cluster_name: String,
    pub env: EnvKind,
    pub network: NetworkRef,
}

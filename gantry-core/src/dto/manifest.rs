//! Engine-facing manifest documents

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One declared resource
///
/// `properties` carries the JSON form of the domain value; the engine
/// reconciles it without this crate's type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub id: String,
    pub kind: String,
    pub properties: serde_json::Value,
}

impl ResourceManifest {
    /// Build a manifest entry from any serializable domain value
    pub fn new<T: Serialize>(
        id: impl Into<String>,
        kind: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            id: id.into(),
            kind: kind.into(),
            properties: serde_json::to_value(value)?,
        })
    }
}

/// A named, independently deployable unit of declared infrastructure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackManifest {
    pub stack: String,
    pub resources: Vec<ResourceManifest>,
    /// Handles registered for by-name resolution from other stacks
    pub exports: BTreeMap<String, String>,
}

impl StackManifest {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            resources: Vec::new(),
            exports: BTreeMap::new(),
        }
    }

    /// Look up a resource by id
    pub fn resource(&self, id: &str) -> Option<&ResourceManifest> {
        self.resources.iter().find(|resource| resource.id == id)
    }
}

/// The full deployment handed to the provisioning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub account: String,
    pub region: String,
    pub stacks: Vec<StackManifest>,
}

impl DeploymentManifest {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
            stacks: Vec::new(),
        }
    }

    pub fn with_stack(mut self, stack: StackManifest) -> Self {
        self.stacks.push(stack);
        self
    }
}

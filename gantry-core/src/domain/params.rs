//! Parameter set validation
//!
//! Deployment inputs arrive as a flat key-value map, supplied once per
//! target microservice. Every key the assembler needs must be present and
//! non-empty before any graph node is built; validation happens once at
//! this boundary instead of lazily during construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::environment::{ClusterRef, EnvKind, NetworkRef};
use crate::error::{AssemblyError, Result};

/// Required parameter keys, in reporting order
///
/// Validation fails on the first key in this order that is missing or
/// empty, so error messages are stable across runs.
pub const REQUIRED_KEYS: [&str; 12] = [
    "microservice_name",
    "code_commit_branch_name",
    "code_commit_s3_bucket_for_code",
    "code_commit_s3_object_key_for_code",
    "vpc_nonprod_id",
    "vpc_prod_id",
    "ecssg_nonprod_id",
    "ecssg_prod_id",
    "ecs_nonprod_name",
    "ecs_prod_name",
    "aws_account",
    "aws_region",
];

/// Raw deployment parameters as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fetch a required value, rejecting missing and empty entries
    fn require(&self, key: &str) -> Result<String> {
        match self.0.get(key) {
            None => Err(AssemblyError::MissingParameter(key.to_string())),
            Some(value) if value.trim().is_empty() => {
                Err(AssemblyError::EmptyParameter(key.to_string()))
            }
            Some(value) => Ok(value.clone()),
        }
    }
}

impl FromIterator<(String, String)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Validated deployment parameters
///
/// One field per required key. Constructing this struct is the only place
/// raw parameters are read; everything downstream works from these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployParams {
    pub microservice_name: String,
    pub branch_name: String,
    pub source_bucket: String,
    pub source_object_key: String,
    pub vpc_nonprod_id: String,
    pub vpc_prod_id: String,
    pub security_group_nonprod_id: String,
    pub security_group_prod_id: String,
    pub cluster_nonprod_name: String,
    pub cluster_prod_name: String,
    pub account: String,
    pub region: String,
}

impl DeployParams {
    /// Validate a raw parameter set
    ///
    /// Fails on the first missing or empty key, in `REQUIRED_KEYS` order.
    ///
    /// # Errors
    /// Returns `MissingParameter` or `EmptyParameter` naming the first
    /// offending key.
    pub fn from_set(set: &ParameterSet) -> Result<Self> {
        Ok(Self {
            microservice_name: set.require("microservice_name")?,
            branch_name: set.require("code_commit_branch_name")?,
            source_bucket: set.require("code_commit_s3_bucket_for_code")?,
            source_object_key: set.require("code_commit_s3_object_key_for_code")?,
            vpc_nonprod_id: set.require("vpc_nonprod_id")?,
            vpc_prod_id: set.require("vpc_prod_id")?,
            security_group_nonprod_id: set.require("ecssg_nonprod_id")?,
            security_group_prod_id: set.require("ecssg_prod_id")?,
            cluster_nonprod_name: set.require("ecs_nonprod_name")?,
            cluster_prod_name: set.require("ecs_prod_name")?,
            account: set.require("aws_account")?,
            region: set.require("aws_region")?,
        })
    }

    /// Resolve the cluster reference for one environment
    ///
    /// The pipeline stack never holds a direct object reference to a
    /// cluster; it resolves the provisioned resources by the names and ids
    /// carried in the parameter set.
    pub fn cluster_ref(&self, env: EnvKind) -> ClusterRef {
        match env {
            EnvKind::NonProd => ClusterRef {
                cluster_name: self.cluster_nonprod_name.clone(),
                env,
                network: NetworkRef {
                    vpc_id: self.vpc_nonprod_id.clone(),
                    security_group_id: self.security_group_nonprod_id.clone(),
                },
            },
            EnvKind::Prod => ClusterRef {
                cluster_name: self.cluster_prod_name.clone(),
                env,
                network: NetworkRef {
                    vpc_id: self.vpc_prod_id.clone(),
                    security_group_id: self.security_group_prod_id.clone(),
                },
            },
        }
    }
}

//! Derived resource identities
//!
//! Every resource name is derived from the microservice name plus a fixed
//! suffix, so the same parameters always produce the same names. No suffix
//! is a suffix of another, which keeps derived ids collision-free across
//! microservices even when one service name extends another
//! (`orders` vs `orders-prod`).

use std::collections::BTreeSet;

use gantry_core::error::{AssemblyError, Result};

/// Identities derived from one microservice name
///
/// Plain resource names (repository, build project, pipeline, service)
/// reuse the microservice name itself; they live in different namespaces
/// and are meant to match. Construct ids and the role name carry suffixes
/// and must be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub microservice: String,
    pub stack: String,
    pub repository: String,
    pub registry_repository: String,
    pub build_project: String,
    pub pipeline: String,
    pub service: String,
    pub execution_role: String,
    pub repository_id: String,
    pub registry_id: String,
    pub build_project_id: String,
    pub registry_grant_id: String,
    pub execution_role_id: String,
    pub service_nonprod_id: String,
    pub service_prod_id: String,
    pub pipeline_id: String,
}

impl ResourceNames {
    /// Derive all identities for one microservice
    pub fn derive(microservice: &str) -> Self {
        Self {
            microservice: microservice.to_string(),
            stack: format!("{microservice}-cicd-stack"),
            repository: microservice.to_string(),
            registry_repository: microservice.to_string(),
            build_project: microservice.to_string(),
            pipeline: microservice.to_string(),
            service: microservice.to_string(),
            execution_role: format!("{microservice}-ecs-taskexecution-role"),
            repository_id: format!("{microservice}-codecommit-id"),
            registry_id: format!("{microservice}-ecrrepo-id"),
            build_project_id: format!("{microservice}-codebuild-id"),
            registry_grant_id: format!("{microservice}-ecrgrant-id"),
            execution_role_id: format!("{microservice}-ecsrole-id"),
            service_nonprod_id: format!("{microservice}-ecs-fargate-nonprod-id"),
            service_prod_id: format!("{microservice}-ecs-fargate-prod-id"),
            pipeline_id: format!("{microservice}-codepipeline-id"),
        }
    }

    /// Every identity that must be unique, in claim order
    pub fn unique_identities(&self) -> [&str; 10] {
        [
            &self.stack,
            &self.repository_id,
            &self.registry_id,
            &self.build_project_id,
            &self.registry_grant_id,
            &self.execution_role_id,
            &self.service_nonprod_id,
            &self.service_prod_id,
            &self.pipeline_id,
            &self.execution_role,
        ]
    }
}

/// Tracks every identity claimed during one assembly
///
/// Derived identities are claimed as the graph is built. A duplicate, or a
/// collision with a reserved pre-existing name, aborts construction;
/// nothing is silently overwritten.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    reserved: BTreeSet<String>,
    claimed: BTreeSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a pre-existing resource name that derived identities must not shadow
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    /// Claim an identity for this assembly
    ///
    /// # Errors
    /// `ExistingResource` if the identity is reserved, `IdentityCollision`
    /// if it was already claimed.
    pub fn claim(&mut self, name: &str) -> Result<()> {
        if self.reserved.contains(name) {
            return Err(AssemblyError::ExistingResource(name.to_string()));
        }
        if !self.claimed.insert(name.to_string()) {
            return Err(AssemblyError::IdentityCollision(name.to_string()));
        }
        Ok(())
    }
}

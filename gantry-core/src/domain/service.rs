//! Service descriptors

use serde::{Deserialize, Serialize};

use crate::domain::environment::{ClusterRef, EnvKind};

/// Principal the execution role is assumed by
pub const TASK_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";

/// Managed policy attached to the execution role
pub const TASK_EXECUTION_POLICY: &str = "service-role/AmazonECSTaskExecutionRolePolicy";

/// Execution identity shared by both services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRole {
    pub name: String,
    pub assumed_by: String,
    pub managed_policy: String,
}

impl ExecutionRole {
    /// Task-execution role with the standard managed policy
    pub fn task_execution(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assumed_by: TASK_PRINCIPAL.to_string(),
            managed_policy: TASK_EXECUTION_POLICY.to_string(),
        }
    }
}

/// Desired state for one running containerized service
///
/// One is instantiated per environment. Both share the image template,
/// container name and execution identity; only the environment and
/// cluster/network references differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub service_name: String,
    pub env: EnvKind,
    pub cluster: ClusterRef,
    pub desired_count: u32,
    pub listener_ports: Vec<u16>,
    pub container_name: String,
    /// Image the service starts with; replaced by the pipeline on deploy
    pub image: String,
    pub execution_role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_execution_role() {
        let role = ExecutionRole::task_execution("orders-ecs-taskexecution-role");
        assert_eq!(role.assumed_by, TASK_PRINCIPAL);
        assert_eq!(role.managed_policy, TASK_EXECUTION_POLICY);
    }
}

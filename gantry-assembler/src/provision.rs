//! Environment provisioning
//!
//! Builds the network stack: one isolated network and one cluster per
//! environment, tagged with stable lookup names. The stack registers every
//! handle in its exports map so the pipeline stack can resolve them by
//! name instead of by direct reference, letting the two stacks deploy
//! independently.

use std::collections::BTreeMap;

use gantry_core::domain::environment::{Cluster, EnvKind, Network};
use gantry_core::dto::manifest::{ResourceManifest, StackManifest};

/// Availability zones each network spans
pub const AVAILABILITY_ZONES: u8 = 2;

/// Capacity provider every cluster schedules onto
pub const CAPACITY_PROVIDER: &str = "FARGATE";

/// The provisioned environment pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStack {
    pub name: String,
    pub networks: Vec<Network>,
    pub clusters: Vec<Cluster>,
    /// Lookup-name registrations consumed by the pipeline stack
    pub exports: BTreeMap<String, String>,
}

impl NetworkStack {
    /// Stable lookup name of one environment's network
    pub fn network_name(service: &str, env: EnvKind) -> String {
        format!("cicd-vpc-{}-{}", env.label(), service)
    }

    /// Stable lookup name of one environment's cluster
    pub fn cluster_name(service: &str, env: EnvKind) -> String {
        format!("cicd-ecs-{}-{}", env.label(), service)
    }

    /// Flatten into the engine-facing manifest
    pub fn manifest(&self) -> StackManifest {
        let mut manifest = StackManifest::new(&self.name);
        for network in &self.networks {
            manifest.resources.push(
                ResourceManifest::new(&network.name, "network", network)
                    .expect("network serializes"),
            );
        }
        for cluster in &self.clusters {
            manifest.resources.push(
                ResourceManifest::new(&cluster.name, "cluster", cluster)
                    .expect("cluster serializes"),
            );
        }
        manifest.exports = self.exports.clone();
        manifest
    }
}

/// Provision both environments for one deployment
///
/// Takes no input beyond the microservice name used for tagging; each
/// environment gets a network spanning [`AVAILABILITY_ZONES`] zones and a
/// cluster bound to it. The resources are created once and referenced by
/// name thereafter; the pipeline never mutates them.
pub fn provision_environments(service: &str) -> NetworkStack {
    let mut networks = Vec::new();
    let mut clusters = Vec::new();
    let mut exports = BTreeMap::new();

    for env in EnvKind::ALL {
        let network = Network {
            name: NetworkStack::network_name(service, env),
            env,
            availability_zones: AVAILABILITY_ZONES,
        };
        let cluster = Cluster {
            name: NetworkStack::cluster_name(service, env),
            env,
            network: network.name.clone(),
            capacity_provider: CAPACITY_PROVIDER.to_string(),
        };

        exports.insert(format!("vpc_{}_id", env.label()), network.name.clone());
        exports.insert(format!("ecs_{}_name", env.label()), cluster.name.clone());

        networks.push(network);
        clusters.push(cluster);
    }

    tracing::debug!(service, environments = EnvKind::ALL.len(), "provisioned environment pair");

    NetworkStack {
        name: format!("cicd-vpc-ecs-{service}"),
        networks,
        clusters,
        exports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisions_one_network_and_cluster_per_environment() {
        let stack = provision_environments("orders");

        assert_eq!(stack.networks.len(), 2);
        assert_eq!(stack.clusters.len(), 2);
        for network in &stack.networks {
            assert_eq!(network.availability_zones, AVAILABILITY_ZONES);
        }
        for cluster in &stack.clusters {
            assert_eq!(cluster.capacity_provider, CAPACITY_PROVIDER);
        }
    }

    #[test]
    fn test_lookup_names_are_stable() {
        let stack = provision_environments("orders");

        assert_eq!(stack.networks[0].name, "cicd-vpc-nonprod-orders");
        assert_eq!(stack.networks[1].name, "cicd-vpc-prod-orders");
        assert_eq!(stack.clusters[0].name, "cicd-ecs-nonprod-orders");
        assert_eq!(stack.clusters[1].name, "cicd-ecs-prod-orders");
    }

    #[test]
    fn test_clusters_bound_to_their_network() {
        let stack = provision_environments("orders");
        for (network, cluster) in stack.networks.iter().zip(&stack.clusters) {
            assert_eq!(cluster.network, network.name);
            assert_eq!(cluster.env, network.env);
        }
    }

    #[test]
    fn test_exports_register_every_handle() {
        let stack = provision_environments("orders");

        assert_eq!(
            stack.exports.get("vpc_nonprod_id").map(String::as_str),
            Some("cicd-vpc-nonprod-orders")
        );
        assert_eq!(
            stack.exports.get("vpc_prod_id").map(String::as_str),
            Some("cicd-vpc-prod-orders")
        );
        assert_eq!(
            stack.exports.get("ecs_nonprod_name").map(String::as_str),
            Some("cicd-ecs-nonprod-orders")
        );
        assert_eq!(
            stack.exports.get("ecs_prod_name").map(String::as_str),
            Some("cicd-ecs-prod-orders")
        );
    }

    #[test]
    fn test_manifest_flattens_all_resources() {
        let stack = provision_environments("orders");
        let manifest = stack.manifest();

        assert_eq!(manifest.stack, "cicd-vpc-ecs-orders");
        assert_eq!(manifest.resources.len(), 4);
        assert_eq!(manifest.exports, stack.exports);

        let cluster = manifest.resource("cicd-ecs-prod-orders").unwrap();
        assert_eq!(cluster.kind, "cluster");
        assert_eq!(cluster.properties["network"], "cicd-vpc-prod-orders");
    }
}

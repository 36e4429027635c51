//! Pipeline stack assembly
//!
//! One pass from validated parameters to the pipeline stack: derived
//! identities, source repository, image registry, build project, execution
//! role, two service descriptors and the four-stage pipeline graph.
//! Stage order is fixed; the production stage always opens with the
//! approval gate.

use gantry_core::Result;
use gantry_core::domain::artifact::{Artifact, ImageDefinition};
use gantry_core::domain::environment::EnvKind;
use gantry_core::domain::params::{DeployParams, ParameterSet};
use gantry_core::domain::pipeline::{Action, ActionKind, PipelineGraph, Stage};
use gantry_core::domain::repository::{RegistryGrant, RegistryRepository, SourceRepository};
use gantry_core::domain::service::{ExecutionRole, ServiceSpec};
use gantry_core::dto::manifest::{ResourceManifest, StackManifest};

use crate::buildspec::{BuildProject, registry_uri};
use crate::names::{NameRegistry, ResourceNames};

pub const STAGE_SOURCE: &str = "Source";
pub const STAGE_BUILD: &str = "Build";
pub const STAGE_DEPLOY_NONPROD: &str = "Deploy-NonProd";
pub const STAGE_DEPLOY_PROD: &str = "Deploy-Prod";

/// Image services run until the first pipeline execution replaces it
pub const STARTER_IMAGE: &str = "public.ecr.aws/nginx/nginx:latest";

pub const HTTP_PORT: u16 = 80;
pub const DB_PORT: u16 = 3306;

/// Instances per service
pub const DESIRED_COUNT: u32 = 2;

/// Listener ports every service exposes
///
/// Built once and shared by both environments; the two ports are
/// concatenated into one list, never used to index each other.
fn listener_ports() -> Vec<u16> {
    vec![HTTP_PORT, DB_PORT]
}

/// The assembled pipeline stack
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStack {
    pub names: ResourceNames,
    pub repository: SourceRepository,
    pub registry: RegistryRepository,
    pub build_project: BuildProject,
    pub registry_grant: RegistryGrant,
    pub execution_role: ExecutionRole,
    pub service_nonprod: ServiceSpec,
    pub service_prod: ServiceSpec,
    pub pipeline: PipelineGraph,
}

impl PipelineStack {
    /// The service descriptor for one environment
    pub fn service(&self, env: EnvKind) -> &ServiceSpec {
        match env {
            EnvKind::NonProd => &self.service_nonprod,
            EnvKind::Prod => &self.service_prod,
        }
    }

    /// Flatten into the engine-facing manifest
    pub fn manifest(&self) -> StackManifest {
        let names = &self.names;
        let mut manifest = StackManifest::new(&names.stack);
        manifest.resources = vec![
            ResourceManifest::new(&names.repository_id, "source-repository", &self.repository)
                .expect("repository serializes"),
            ResourceManifest::new(&names.registry_id, "registry-repository", &self.registry)
                .expect("registry serializes"),
            ResourceManifest::new(&names.build_project_id, "build-project", &self.build_project)
                .expect("build project serializes"),
            ResourceManifest::new(&names.registry_grant_id, "registry-grant", &self.registry_grant)
                .expect("grant serializes"),
            ResourceManifest::new(&names.execution_role_id, "execution-role", &self.execution_role)
                .expect("role serializes"),
            ResourceManifest::new(&names.service_nonprod_id, "service", &self.service_nonprod)
                .expect("service serializes"),
            ResourceManifest::new(&names.service_prod_id, "service", &self.service_prod)
                .expect("service serializes"),
            ResourceManifest::new(&names.pipeline_id, "pipeline", &self.pipeline)
                .expect("pipeline serializes"),
        ];
        manifest
    }
}

/// Assembles the pipeline stack from a parameter set
#[derive(Debug, Clone, Default)]
pub struct PipelineAssembler {
    reserved: Vec<String>,
}

impl PipelineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register pre-existing resource names that derived identities must
    /// not shadow
    pub fn with_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
        self
    }

    /// Validate the raw parameter set and assemble the stack
    ///
    /// # Errors
    /// Fails fast on the first missing/empty parameter or identity
    /// collision; no partial stack is produced.
    pub fn assemble(&self, set: &ParameterSet) -> Result<PipelineStack> {
        let params = DeployParams::from_set(set)?;
        self.assemble_params(&params)
    }

    /// Assemble the stack from already-validated parameters
    pub fn assemble_params(&self, params: &DeployParams) -> Result<PipelineStack> {
        let names = ResourceNames::derive(&params.microservice_name);

        let mut registry = NameRegistry::new();
        for name in &self.reserved {
            registry.reserve(name);
        }
        for identity in names.unique_identities() {
            registry.claim(identity)?;
        }
        tracing::debug!(
            microservice = %params.microservice_name,
            "derived resource identities"
        );

        let repository = SourceRepository {
            name: names.repository.clone(),
            description: format!("Repository for {}", params.microservice_name),
            branch: params.branch_name.clone(),
            seed_bucket: params.source_bucket.clone(),
            seed_object_key: params.source_object_key.clone(),
        };

        let image_registry = RegistryRepository {
            name: names.registry_repository.clone(),
            uri: registry_uri(&params.account, &params.region, &names.registry_repository),
        };

        let build_project = BuildProject::image_build(&names.build_project, &image_registry.uri);

        // The build cannot push without this; emitted unconditionally.
        let registry_grant = RegistryGrant::push_pull(&names.build_project, &image_registry.name);

        let execution_role = ExecutionRole::task_execution(&names.execution_role);

        let service_nonprod = self.service_spec(params, &names, EnvKind::NonProd);
        let service_prod = self.service_spec(params, &names, EnvKind::Prod);

        let pipeline = self.pipeline_graph(&names, &repository.branch);

        tracing::info!(
            pipeline = %pipeline.name,
            stages = pipeline.stages.len(),
            "assembled pipeline stack"
        );

        Ok(PipelineStack {
            names,
            repository,
            registry: image_registry,
            build_project,
            registry_grant,
            execution_role,
            service_nonprod,
            service_prod,
            pipeline,
        })
    }

    /// Service descriptor for one environment
    ///
    /// Both environments share the image template, container name, count,
    /// ports and execution identity; only the cluster/network references
    /// differ.
    fn service_spec(
        &self,
        params: &DeployParams,
        names: &ResourceNames,
        env: EnvKind,
    ) -> ServiceSpec {
        ServiceSpec {
            service_name: names.service.clone(),
            env,
            cluster: params.cluster_ref(env),
            desired_count: DESIRED_COUNT,
            listener_ports: listener_ports(),
            container_name: ImageDefinition::CONTAINER_NAME.to_string(),
            image: STARTER_IMAGE.to_string(),
            execution_role: names.execution_role.clone(),
        }
    }

    /// The four-stage graph with its artifact wiring
    fn pipeline_graph(&self, names: &ResourceNames, branch: &str) -> PipelineGraph {
        let source = Action::new(
            "Source",
            ActionKind::Source {
                repository: names.repository.clone(),
                branch: branch.to_string(),
                output: Artifact::source(),
                full_clone: true,
            },
        );

        let build = Action::new(
            "Build",
            ActionKind::Build {
                project: names.build_project.clone(),
                input: Artifact::source(),
                outputs: vec![Artifact::image_definitions()],
            },
        );

        let deploy_nonprod = Action::new(
            "Deploy",
            ActionKind::Deploy {
                service: names.service.clone(),
                env: EnvKind::NonProd,
                input: Artifact::image_definitions(),
            },
        );

        let approve = Action::new("Approve-Prod-Deploy", ActionKind::Approval).with_run_order(1);
        let deploy_prod = Action::new(
            "Deploy",
            ActionKind::Deploy {
                service: names.service.clone(),
                env: EnvKind::Prod,
                input: Artifact::image_definitions(),
            },
        )
        .with_run_order(2);

        PipelineGraph {
            name: names.pipeline.clone(),
            stages: vec![
                Stage::new(STAGE_SOURCE, vec![source]),
                Stage::new(STAGE_BUILD, vec![build]),
                Stage::new(STAGE_DEPLOY_NONPROD, vec![deploy_nonprod]),
                Stage::new(STAGE_DEPLOY_PROD, vec![approve, deploy_prod]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::AssemblyError;
    use gantry_core::domain::artifact::IMAGE_DEFINITIONS_ARTIFACT;
    use gantry_core::domain::params::REQUIRED_KEYS;

    fn params(microservice: &str) -> ParameterSet {
        [
            ("microservice_name", microservice),
            ("code_commit_branch_name", "main"),
            ("code_commit_s3_bucket_for_code", "starter-code"),
            ("code_commit_s3_object_key_for_code", "starter.zip"),
            ("vpc_nonprod_id", "vpc-0aa11bb22cc33dd44"),
            ("vpc_prod_id", "vpc-0ee55ff66aa77bb88"),
            ("ecssg_nonprod_id", "sg-0123456789abcdef0"),
            ("ecssg_prod_id", "sg-0fedcba9876543210"),
            ("ecs_nonprod_name", "cicd-ecs-nonprod-app"),
            ("ecs_prod_name", "cicd-ecs-prod-app"),
            ("aws_account", "123456789012"),
            ("aws_region", "eu-west-1"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let assembler = PipelineAssembler::new();
        let first = assembler.assemble(&params("orders")).unwrap();
        let second = assembler.assemble(&params("orders")).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.manifest()).unwrap(),
            serde_json::to_string(&second.manifest()).unwrap()
        );
    }

    #[test]
    fn test_listener_ports_match_across_environments() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();

        let nonprod = &stack.service_nonprod.listener_ports;
        let prod = &stack.service_prod.listener_ports;
        assert_eq!(nonprod.len(), prod.len());
        assert_eq!(nonprod, prod);
        assert_eq!(*prod, vec![HTTP_PORT, DB_PORT]);
    }

    #[test]
    fn test_services_differ_only_in_environment_wiring() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();
        let nonprod = &stack.service_nonprod;
        let prod = &stack.service_prod;

        assert_eq!(nonprod.service_name, prod.service_name);
        assert_eq!(nonprod.image, prod.image);
        assert_eq!(nonprod.container_name, prod.container_name);
        assert_eq!(nonprod.desired_count, prod.desired_count);
        assert_eq!(nonprod.execution_role, prod.execution_role);

        assert_eq!(nonprod.env, EnvKind::NonProd);
        assert_eq!(prod.env, EnvKind::Prod);
        assert_ne!(nonprod.cluster, prod.cluster);
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();

        assert_eq!(
            stack.pipeline.stage_names(),
            vec![STAGE_SOURCE, STAGE_BUILD, STAGE_DEPLOY_NONPROD, STAGE_DEPLOY_PROD]
        );
    }

    #[test]
    fn test_prod_stage_gates_before_deploy() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();
        let prod = stack.pipeline.stage(STAGE_DEPLOY_PROD).unwrap();

        let gates: Vec<&Action> = prod.actions.iter().filter(|a| a.is_gate()).collect();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].name, "Approve-Prod-Deploy");

        let ordered = prod.actions_in_order();
        assert!(ordered[0].is_gate());
        assert!(ordered[0].run_order < ordered[1].run_order);
        assert!(matches!(ordered[1].kind, ActionKind::Deploy { env: EnvKind::Prod, .. }));
    }

    #[test]
    fn test_image_definitions_is_the_only_shared_artifact() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();

        let nonprod_inputs = stack.pipeline.stage(STAGE_DEPLOY_NONPROD).unwrap().inputs();
        let prod_inputs = stack.pipeline.stage(STAGE_DEPLOY_PROD).unwrap().inputs();

        assert_eq!(nonprod_inputs.len(), 1);
        assert_eq!(prod_inputs.len(), 1);
        assert_eq!(nonprod_inputs[0].name, IMAGE_DEFINITIONS_ARTIFACT);
        assert_eq!(nonprod_inputs, prod_inputs);

        // Produced by Build, and by nothing else.
        let producers: Vec<&str> = stack
            .pipeline
            .stages
            .iter()
            .flat_map(|stage| &stage.actions)
            .filter(|action| {
                action.outputs().iter().any(|a| a.name == IMAGE_DEFINITIONS_ARTIFACT)
            })
            .map(|action| action.name.as_str())
            .collect();
        assert_eq!(producers, vec!["Build"]);
    }

    #[test]
    fn test_orders_scenario_derives_names() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();

        assert_eq!(stack.pipeline.name, "orders");
        assert_eq!(stack.build_project.name, "orders");
        assert_eq!(stack.repository.name, "orders");
        assert_eq!(stack.repository.description, "Repository for orders");
        assert_eq!(stack.pipeline.stages.len(), 4);
    }

    #[test]
    fn test_same_name_twice_yields_identical_independent_graphs() {
        let first = PipelineAssembler::new().assemble(&params("billing")).unwrap();
        let second = PipelineAssembler::new().assemble(&params("billing")).unwrap();

        assert_eq!(first.names, second.names);
        assert_eq!(first.pipeline, second.pipeline);
    }

    #[test]
    fn test_derived_names_vary_only_by_microservice_name() {
        let billing = PipelineAssembler::new().assemble(&params("billing")).unwrap();
        let orders = PipelineAssembler::new().assemble(&params("orders")).unwrap();

        for (a, b) in billing
            .names
            .unique_identities()
            .into_iter()
            .zip(orders.names.unique_identities())
        {
            assert_eq!(a.replace("billing", "{name}"), b.replace("orders", "{name}"));
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_missing_parameter_aborts_before_any_stage() {
        for key in REQUIRED_KEYS {
            let mut set = params("orders");
            set.insert(key, "");

            let err = PipelineAssembler::new().assemble(&set).unwrap_err();
            assert_eq!(err, AssemblyError::EmptyParameter(key.to_string()));
        }
    }

    #[test]
    fn test_reserved_name_collision_is_reported() {
        let assembler =
            PipelineAssembler::new().with_reserved_names(["orders-codepipeline-id"]);

        let err = assembler.assemble(&params("orders")).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::ExistingResource("orders-codepipeline-id".to_string())
        );
    }

    #[test]
    fn test_build_project_pushes_to_derived_registry() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();

        assert!(stack.registry.uri.ends_with("/orders"));
        assert_eq!(
            stack.build_project.environment_variables.get("REPOSITORY_URI"),
            Some(&stack.registry.uri)
        );
        assert!(stack.registry_grant.push && stack.registry_grant.pull);
        assert_eq!(stack.registry_grant.grantee, "orders");
        assert_eq!(stack.registry_grant.repository, stack.registry.name);
    }

    #[test]
    fn test_manifest_contains_every_resource() {
        let stack = PipelineAssembler::new().assemble(&params("orders")).unwrap();
        let manifest = stack.manifest();

        assert_eq!(manifest.stack, "orders-cicd-stack");
        assert_eq!(manifest.resources.len(), 8);
        for id in [
            "orders-codecommit-id",
            "orders-ecrrepo-id",
            "orders-codebuild-id",
            "orders-ecrgrant-id",
            "orders-ecsrole-id",
            "orders-ecs-fargate-nonprod-id",
            "orders-ecs-fargate-prod-id",
            "orders-codepipeline-id",
        ] {
            assert!(manifest.resource(id).is_some(), "missing resource {id}");
        }
    }
}

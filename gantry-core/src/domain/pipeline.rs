//! Pipeline stage graph
//!
//! A pipeline is an ordered list of named stages, each holding one or more
//! actions. Actions within a stage run in ascending run order; a gating
//! Approval action blocks every later action in its stage until an
//! external actor approves.

use serde::{Deserialize, Serialize};

use crate::domain::artifact::Artifact;
use crate::domain::environment::EnvKind;

/// One unit of work within a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    /// Relative order within the stage; equal orders may run in parallel
    pub run_order: u32,
    pub kind: ActionKind,
}

/// What an action does and which artifacts it touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Checks out the configured branch and emits the source snapshot
    Source {
        repository: String,
        branch: String,
        output: Artifact,
        /// Emit a full clone so the build can resolve revision ids
        full_clone: bool,
    },
    /// Runs the build project against an input artifact
    Build {
        project: String,
        input: Artifact,
        outputs: Vec<Artifact>,
    },
    /// Rolls the referenced service onto the built image
    Deploy {
        service: String,
        env: EnvKind,
        input: Artifact,
    },
    /// Blocks later actions in the stage until externally approved
    Approval,
}

impl Action {
    /// New action with the default run order (1)
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            run_order: 1,
            kind,
        }
    }

    pub fn with_run_order(mut self, run_order: u32) -> Self {
        self.run_order = run_order;
        self
    }

    /// The artifact this action consumes, if any
    pub fn input(&self) -> Option<&Artifact> {
        match &self.kind {
            ActionKind::Build { input, .. } | ActionKind::Deploy { input, .. } => Some(input),
            ActionKind::Source { .. } | ActionKind::Approval => None,
        }
    }

    /// The artifacts this action produces
    pub fn outputs(&self) -> Vec<&Artifact> {
        match &self.kind {
            ActionKind::Source { output, .. } => vec![output],
            ActionKind::Build { outputs, .. } => outputs.iter().collect(),
            ActionKind::Deploy { .. } | ActionKind::Approval => Vec::new(),
        }
    }

    /// Check if this action gates the rest of its stage
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, ActionKind::Approval)
    }
}

/// An ordered, named phase of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

impl Stage {
    pub fn new(name: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }

    /// Actions sorted by run order (stable for equal orders)
    pub fn actions_in_order(&self) -> Vec<&Action> {
        let mut ordered: Vec<&Action> = self.actions.iter().collect();
        ordered.sort_by_key(|action| action.run_order);
        ordered
    }

    /// The gating action of this stage, if it has one
    pub fn gate(&self) -> Option<&Action> {
        self.actions.iter().find(|action| action.is_gate())
    }

    /// Artifacts consumed by any action in this stage
    pub fn inputs(&self) -> Vec<&Artifact> {
        self.actions.iter().filter_map(Action::input).collect()
    }
}

/// The assembled pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineGraph {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl PipelineGraph {
    /// Look up a stage by name
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    /// Stage names in declared order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy(env: EnvKind) -> ActionKind {
        ActionKind::Deploy {
            service: "orders".to_string(),
            env,
            input: Artifact::image_definitions(),
        }
    }

    #[test]
    fn test_actions_in_order_sorts_by_run_order() {
        let stage = Stage::new(
            "Deploy-Prod",
            vec![
                Action::new("Deploy", deploy(EnvKind::Prod)).with_run_order(2),
                Action::new("Approve-Prod-Deploy", ActionKind::Approval).with_run_order(1),
            ],
        );

        let ordered = stage.actions_in_order();
        assert_eq!(ordered[0].name, "Approve-Prod-Deploy");
        assert_eq!(ordered[1].name, "Deploy");
    }

    #[test]
    fn test_gate_detection() {
        let gated = Stage::new(
            "Deploy-Prod",
            vec![
                Action::new("Approve-Prod-Deploy", ActionKind::Approval),
                Action::new("Deploy", deploy(EnvKind::Prod)).with_run_order(2),
            ],
        );
        assert!(gated.gate().is_some());

        let ungated = Stage::new(
            "Deploy-NonProd",
            vec![Action::new("Deploy", deploy(EnvKind::NonProd))],
        );
        assert!(ungated.gate().is_none());
    }

    #[test]
    fn test_action_artifact_accessors() {
        let source = Action::new(
            "Source",
            ActionKind::Source {
                repository: "orders".to_string(),
                branch: "main".to_string(),
                output: Artifact::source(),
                full_clone: true,
            },
        );
        assert!(source.input().is_none());
        assert_eq!(source.outputs(), vec![&Artifact::source()]);

        let build = Action::new(
            "Build",
            ActionKind::Build {
                project: "orders".to_string(),
                input: Artifact::source(),
                outputs: vec![Artifact::image_definitions()],
            },
        );
        assert_eq!(build.input(), Some(&Artifact::source()));
        assert_eq!(build.outputs(), vec![&Artifact::image_definitions()]);
    }
}

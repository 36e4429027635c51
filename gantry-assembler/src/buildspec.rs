//! Build step specification
//!
//! The build executor is an opaque external collaborator: it receives the
//! source snapshot and must emit `imagedefinitions.json`, a single-entry
//! list naming the `app` container and its fully qualified image reference.
//! This module renders the script document that instructs it to do so.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gantry_core::domain::artifact::{IMAGE_DEFINITIONS_ARTIFACT, ImageDefinition};

/// File the build step must emit as its output artifact
pub const IMAGE_DEFINITIONS_FILE: &str = "imagedefinitions.json";

/// Environment variable carrying the registry repository URI
pub const REPOSITORY_URI_VAR: &str = "REPOSITORY_URI";

/// Fully qualified registry repository URI
pub fn registry_uri(account: &str, region: &str, repository: &str) -> String {
    format!("{account}.dkr.ecr.{region}.amazonaws.com/{repository}")
}

/// Script document handed to the build executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    pub version: String,
    pub env: BuildEnv,
    pub phases: Phases,
    pub artifacts: ArtifactsSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEnv {
    /// Variables the executor exports back to the pipeline
    #[serde(rename = "exported-variables")]
    pub exported_variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phases {
    pub build: Phase,
    pub post_build: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactsSpec {
    pub files: String,
    #[serde(rename = "secondary-artifacts")]
    pub secondary_artifacts: BTreeMap<String, SecondaryArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryArtifact {
    pub files: String,
    pub name: String,
}

impl BuildSpec {
    /// Standard container-image build
    ///
    /// Authenticates to the registry, builds the image tagged `latest`,
    /// re-tags it with the resolved source revision, pushes both tags and
    /// emits the image-definition file as the declared output artifact.
    pub fn image_build() -> Self {
        let definition = format!(
            r#"printf '[{{"name":"{}","imageUri":"%s"}}]' $REPOSITORY_URI:$imageTag > {}"#,
            ImageDefinition::CONTAINER_NAME,
            IMAGE_DEFINITIONS_FILE,
        );

        Self {
            version: "0.2".to_string(),
            env: BuildEnv {
                exported_variables: vec!["imageTag".to_string()],
            },
            phases: Phases {
                build: Phase {
                    commands: vec![
                        "$(aws ecr get-login --region $AWS_DEFAULT_REGION --no-include-email)"
                            .to_string(),
                        "docker build -t $REPOSITORY_URI:latest .".to_string(),
                        "docker tag $REPOSITORY_URI:latest $REPOSITORY_URI:$CODEBUILD_RESOLVED_SOURCE_VERSION"
                            .to_string(),
                    ],
                },
                post_build: Phase {
                    commands: vec![
                        "docker push $REPOSITORY_URI:latest".to_string(),
                        "docker push $REPOSITORY_URI:$CODEBUILD_RESOLVED_SOURCE_VERSION"
                            .to_string(),
                        "export imageTag=$CODEBUILD_RESOLVED_SOURCE_VERSION".to_string(),
                        definition,
                    ],
                },
            },
            artifacts: ArtifactsSpec {
                files: IMAGE_DEFINITIONS_FILE.to_string(),
                secondary_artifacts: BTreeMap::from([(
                    IMAGE_DEFINITIONS_ARTIFACT.to_string(),
                    SecondaryArtifact {
                        files: IMAGE_DEFINITIONS_FILE.to_string(),
                        name: IMAGE_DEFINITIONS_ARTIFACT.to_string(),
                    },
                )]),
            },
        }
    }
}

/// The build project and its execution environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProject {
    pub name: String,
    /// Container builds need a privileged environment
    pub privileged: bool,
    pub environment_variables: BTreeMap<String, String>,
    pub spec: BuildSpec,
}

impl BuildProject {
    /// Image-build project pushing to the given registry repository URI
    pub fn image_build(name: impl Into<String>, repository_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: true,
            environment_variables: BTreeMap::from([(
                REPOSITORY_URI_VAR.to_string(),
                repository_uri.into(),
            )]),
            spec: BuildSpec::image_build(),
        }
    }
}

//! Pipeline artifacts
//!
//! An artifact is an immutable named bundle produced by one action and
//! consumed by later actions. Exactly two flow through the pipeline: the
//! source snapshot and the image-definition descriptor.

use serde::{Deserialize, Serialize};

/// Name of the source snapshot artifact
pub const SOURCE_ARTIFACT: &str = "source";

/// Name of the image-definition artifact produced by the build step
pub const IMAGE_DEFINITIONS_ARTIFACT: &str = "imagedefinitions";

/// Named handoff between pipeline actions
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact {
    pub name: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The source snapshot produced by the Source action
    pub fn source() -> Self {
        Self::new(SOURCE_ARTIFACT)
    }

    /// The image-definition descriptor produced by the Build action
    pub fn image_definitions() -> Self {
        Self::new(IMAGE_DEFINITIONS_ARTIFACT)
    }
}

/// One entry of the image-definition file the build step emits
///
/// The deploy stages consume a JSON list of exactly one of these, naming
/// the `app` container and its fully qualified image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefinition {
    pub name: String,
    #[serde(rename = "imageUri")]
    pub image_uri: String,
}

impl ImageDefinition {
    /// The single logical container every deploy targets
    pub const CONTAINER_NAME: &'static str = "app";

    /// Definition for the `app` container
    pub fn app(image_uri: impl Into<String>) -> Self {
        Self {
            name: Self::CONTAINER_NAME.to_string(),
            image_uri: image_uri.into(),
        }
    }
}

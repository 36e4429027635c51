//! Source and image repositories

use serde::{Deserialize, Serialize};

/// The source repository the pipeline watches
///
/// Created with starter code seeded from an object-store bundle; the
/// pipeline tracks one branch of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepository {
    pub name: String,
    pub description: String,
    pub branch: String,
    /// Bucket holding the starter-code bundle
    pub seed_bucket: String,
    /// Object key of the starter-code bundle
    pub seed_object_key: String,
}

/// The image registry repository the build pushes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRepository {
    pub name: String,
    /// Fully qualified repository URI
    pub uri: String,
}

/// Push/pull rights granted to the build project on a registry repository
///
/// The build cannot push images without this grant; it is a hard
/// precondition of the pipeline and is always emitted with the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryGrant {
    pub grantee: String,
    pub repository: String,
    pub pull: bool,
    pub push: bool,
}

impl RegistryGrant {
    /// Full push/pull grant for a build project
    pub fn push_pull(grantee: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            grantee: grantee.into(),
            repository: repository.into(),
            pull: true,
            push: true,
        }
    }
}

//! Error types for manifest construction

use thiserror::Error;

/// Result type alias for construction operations
pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Errors that can occur while constructing a deployment manifest
///
/// Construction fails closed: the first error aborts and no partial
/// manifest is ever returned. External execution failures (build, deploy,
/// provisioning) belong to the provisioning engine and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// A required parameter is absent from the parameter set
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// A required parameter is present but empty
    #[error("required parameter is empty: {0}")]
    EmptyParameter(String),

    /// Two derived identities resolved to the same name
    #[error("derived identity collision: {0}")]
    IdentityCollision(String),

    /// A derived identity collides with a pre-existing resource name
    #[error("identity collides with existing resource: {0}")]
    ExistingResource(String),
}

impl AssemblyError {
    /// The parameter key or identity this error names
    pub fn subject(&self) -> &str {
        match self {
            Self::MissingParameter(s)
            | Self::EmptyParameter(s)
            | Self::IdentityCollision(s)
            | Self::ExistingResource(s) => s,
        }
    }

    /// Check if this is a configuration error (bad parameter set)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingParameter(_) | Self::EmptyParameter(_))
    }

    /// Check if this is a construction error (identity collision)
    pub fn is_construction(&self) -> bool {
        !self.is_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_subject() {
        let err = AssemblyError::MissingParameter("aws_region".to_string());
        assert_eq!(err.subject(), "aws_region");
        assert!(err.is_configuration());

        let err = AssemblyError::IdentityCollision("orders-codebuild-id".to_string());
        assert_eq!(err.subject(), "orders-codebuild-id");
        assert!(err.is_construction());
    }
}

//! Configuration module
//!
//! Handles CLI configuration shared across commands.

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Account override applied to the loaded parameter set
    pub account: Option<String>,
    /// Region override applied to the loaded parameter set
    pub region: Option<String>,
}

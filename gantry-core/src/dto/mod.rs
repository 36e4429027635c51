//! Documents handed to the provisioning engine
//!
//! The provisioning engine consumes a flat, declarative resource document
//! rather than the rich domain types; this module is that document.

pub mod manifest;

//! CLI command implementations.

pub mod generate;
pub mod measure;
pub mod profiles;

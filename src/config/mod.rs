//! Configuration module
//!
//! Environment variable parsing and resolution

pub mod env;

pub use env::{AnalyzerConfig, DatabaseConfig, EnvConfig, SshTargetConfig};

//! Infrastructure module
//!
//! Wraps external dependencies (SSH transport, command execution, the
//! text-analysis HTTP client)

pub mod analyzer;
pub mod command;
pub mod ssh;

#[cfg(test)]
pub mod testing;

pub use analyzer::LogAnalyzer;
pub use command::CommandRunner;
pub use ssh::{RemoteHost, SshSession};

//! Domain models
//!
//! Pure data structures, no axum/tokio dependencies

pub mod health;
pub mod remote;
pub mod service;
pub mod stats;

// Re-exports for convenience
pub use health::{HealthProbeOutcome, PollConfig};
pub use remote::{CommandRequest, CommandResult, RemoteTarget};
pub use service::ServiceSpec;
pub use stats::StatsRecord;

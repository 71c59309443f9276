pub mod config;
pub mod error;
pub mod exec;
pub mod lint;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod runner;

// Re-export main types for easier access
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult, TaskFailure};
pub use registry::{Target, TARGETS};
pub use runner::{RunOutcome, TargetOutcome};

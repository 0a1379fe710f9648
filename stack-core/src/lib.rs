//! Core domain types for stack deployment
//!
//! Shared by the deployer binary and its tests: the cluster status schema,
//! agent-state classification, wait/probe outcomes, progress reporting and
//! the fatal error taxonomy.

pub mod error;
pub mod outcome;
pub mod sink;
pub mod states;
pub mod status;

pub use error::{DeployError, Result};
pub use outcome::{ConvergenceOutcome, ReadinessOutcome};
pub use sink::{MemorySink, ProgressSink};
pub use states::{StateGroups, agent_states};
pub use status::{MachineStatus, ServiceStatus, StatusSnapshot, UnitStatus};

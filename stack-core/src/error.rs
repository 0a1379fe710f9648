//! Error types for stack deployment
//!
//! Every variant is fatal: it aborts the run and is reported by the
//! binary's entry point. Transient probe failures never become a
//! `DeployError`.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for deployment operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Fatal deployment errors
#[derive(Debug, Error)]
pub enum DeployError {
    /// An orchestration command exited non-zero
    #[error("command `{command}` failed with exit code {}: {stderr}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// Full command line
        command: String,
        /// Exit code, absent when killed by a signal
        code: Option<i32>,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// An orchestration command could not be started at all
    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A machine or unit reported an error agent state
    #[error("unit {entity} is in state {state}")]
    ErroredUnit { entity: String, state: String },

    /// Agents did not all reach "started" in time
    #[error("timed out after {}s waiting for agents to start ({pending})", .waited.as_secs())]
    ConvergenceTimeout {
        waited: Duration,
        /// Last pending-state summary
        pending: String,
    },

    /// The readiness marker never appeared
    #[error("cannot get welcome screen at {url}")]
    ReadinessTimeout { url: String },

    /// Status output did not match the expected schema
    #[error("failed to parse status output: {0}")]
    StatusParse(#[source] serde_yaml::Error),

    /// The designated unit is absent from the status
    #[error("unit {unit} not found in status")]
    MissingUnit { unit: String },

    /// The designated unit has no public address
    #[error("unit {unit} has no public address")]
    MissingAddress { unit: String },
}

impl DeployError {
    /// Check if this error came from the orchestration CLI itself
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. } | Self::CommandSpawn { .. })
    }

    /// Check if this error is one of the time-budget exhaustions
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceTimeout { .. } | Self::ReadinessTimeout { .. }
        )
    }
}

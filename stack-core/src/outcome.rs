//! Terminal results of the convergence wait and the readiness probe

use std::time::Duration;

use crate::error::{DeployError, Result};
use crate::status::StatusSnapshot;

/// How a convergence wait ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvergenceOutcome {
    /// Every machine and unit reported "started"
    Converged(StatusSnapshot),
    /// An entity reported an error state
    Errored { entity: String, state: String },
    /// The time budget ran out
    TimedOut {
        waited: Duration,
        /// Pending summary from the last tick
        pending: String,
    },
}

impl ConvergenceOutcome {
    /// Converts the outcome into a result, keeping the converged snapshot
    pub fn into_result(self) -> Result<StatusSnapshot> {
        match self {
            ConvergenceOutcome::Converged(status) => Ok(status),
            ConvergenceOutcome::Errored { entity, state } => {
                Err(DeployError::ErroredUnit { entity, state })
            }
            ConvergenceOutcome::TimedOut { waited, pending } => {
                Err(DeployError::ConvergenceTimeout { waited, pending })
            }
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceOutcome::Converged(_))
    }
}

/// How a readiness probe ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessOutcome {
    Ready,
    /// The marker was never seen at `url`
    TimedOut { url: String },
}

impl ReadinessOutcome {
    pub fn into_result(self) -> Result<()> {
        match self {
            ReadinessOutcome::Ready => Ok(()),
            ReadinessOutcome::TimedOut { url } => Err(DeployError::ReadinessTimeout { url }),
        }
    }
}

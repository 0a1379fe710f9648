//! Convergence waiter
//!
//! Polls cluster status until every machine and unit agent reports
//! "started". Each tick fetches a fresh snapshot and classifies it:
//! - any error state ends the wait immediately
//! - anything else that is not "started" keeps it going
//! - nothing pending ends it with the converged snapshot
//!
//! The time budget is only checked between ticks; a status fetch that
//! hangs is not interrupted.

use stack_core::{ConvergenceOutcome, ProgressSink, Result, agent_states};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use super::poller::until_timeout;
use crate::juju::StatusSource;

/// Default time budget for convergence
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

/// Default delay between status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Waits for all agents to start
#[derive(Debug, Clone)]
pub struct ConvergenceWaiter {
    max_wait: Duration,
    poll_interval: Duration,
}

impl ConvergenceWaiter {
    /// Creates a waiter
    ///
    /// # Arguments
    /// * `max_wait` - Time budget for the whole wait
    /// * `poll_interval` - Delay between status fetches
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            max_wait,
            poll_interval,
        }
    }

    /// Waits until every machine and unit agent is "started"
    ///
    /// The pending summary of every tick is written to `sink`. Errors
    /// fetching status are returned as `Err`; the three ways the wait
    /// itself can end are the variants of [`ConvergenceOutcome`].
    pub async fn wait_for_started<S>(
        &self,
        source: &S,
        sink: &mut dyn ProgressSink,
    ) -> Result<ConvergenceOutcome>
    where
        S: StatusSource + ?Sized,
    {
        info!("Waiting up to {:?} for agents to start", self.max_wait);

        let mut ticks = until_timeout(self.max_wait);
        let mut last_pending = String::new();

        while let Some(elapsed) = ticks.next() {
            let status = source.get_status().await?;
            let states = agent_states(&status);

            if let Some((entity, state)) = states.first_error() {
                warn!("{} is in state {}", entity, state);
                return Ok(ConvergenceOutcome::Errored {
                    entity: entity.to_string(),
                    state: state.to_string(),
                });
            }

            let summary = states.pending_summary();
            sink.pending(&summary);

            if states.is_converged() {
                info!(
                    "All {} agent(s) started after {:?}",
                    states.entity_count(),
                    elapsed
                );
                return Ok(ConvergenceOutcome::Converged(status));
            }

            debug!(
                "Still pending after {:?} ({:?} left): {}",
                elapsed,
                ticks.remaining(),
                summary
            );
            last_pending = summary;
            sleep(self.poll_interval).await;
        }

        warn!("Timed out waiting for agents: {}", last_pending);
        Ok(ConvergenceOutcome::TimedOut {
            waited: self.max_wait,
            pending: last_pending,
        })
    }
}

impl Default for ConvergenceWaiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL)
    }
}

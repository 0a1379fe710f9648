//! Bounded poller
//!
//! A time-boxed tick source. Iteration continues while the wall-clock time
//! since the iterator was created is below the timeout and ends, without
//! error, once it is reached. Callers pace themselves between ticks and
//! decide what exhaustion means.

use tokio::time::{Duration, Instant};

/// Yields the elapsed time on every tick until `timeout` is reached
///
/// The deadline is checked before every tick, including the first, so a
/// zero timeout yields nothing.
///
/// # Example
/// ```ignore
/// for _elapsed in until_timeout(Duration::from_secs(30)) {
///     if check().await {
///         return Ok(());
///     }
///     tokio::time::sleep(Duration::from_secs(1)).await;
/// }
/// Err(timed_out())
/// ```
pub fn until_timeout(timeout: Duration) -> UntilTimeout {
    UntilTimeout {
        started: Instant::now(),
        timeout,
    }
}

/// Iterator returned by [`until_timeout`]
#[derive(Debug, Clone)]
pub struct UntilTimeout {
    started: Instant,
    timeout: Duration,
}

impl UntilTimeout {
    /// Time since the iterator was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.elapsed())
    }
}

impl Iterator for UntilTimeout {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let elapsed = self.elapsed();
        (elapsed < self.timeout).then_some(elapsed)
    }
}

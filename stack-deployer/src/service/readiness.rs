//! Readiness prober
//!
//! Polls a page of the deployed application until its body contains a
//! marker string. Failed requests, error statuses and bodies without the
//! marker all mean "not ready yet" and are retried after a fixed delay.

use stack_client::PageFetcher;
use stack_core::{ReadinessOutcome, Result};
use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use crate::scheduler::until_timeout;

/// Path of the WordPress installer page
pub const INSTALL_PATH: &str = "wp-admin/install.php";

/// Text shown by the installer once WordPress is up
pub const WELCOME_TEXT: &str = "Welcome to the famous five minute WordPress installation process!";

/// Default time budget for the probe
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// Default delay between probe attempts
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// Time-boxed HTTP readiness check
#[derive(Debug, Clone)]
pub struct ReadinessProber {
    path: String,
    max_wait: Duration,
    interval: Duration,
}

impl ReadinessProber {
    /// Creates a prober for `http://<host>/<path>`
    ///
    /// # Arguments
    /// * `path` - Page to fetch, relative to the host root
    /// * `max_wait` - Time budget for the whole probe
    /// * `interval` - Delay between attempts
    pub fn new(path: impl Into<String>, max_wait: Duration, interval: Duration) -> Self {
        Self {
            path: path.into().trim_start_matches('/').to_string(),
            max_wait,
            interval,
        }
    }

    /// URL probed for `host`
    pub fn url(&self, host: &str) -> String {
        format!("http://{}/{}", host, self.path)
    }

    /// Polls until the page on `host` contains `marker`
    pub async fn check_ready<F>(&self, fetcher: &F, host: &str, marker: &str) -> ReadinessOutcome
    where
        F: PageFetcher + ?Sized,
    {
        let url = self.url(host);
        info!("Probing {} for up to {:?}", url, self.max_wait);

        for elapsed in until_timeout(self.max_wait) {
            match fetcher.fetch(&url).await {
                Ok(body) if body.contains(marker) => {
                    info!("{} is ready after {:?}", url, elapsed);
                    return ReadinessOutcome::Ready;
                }
                Ok(_) => debug!("{} does not show the marker yet", url),
                Err(e) => debug!("{} not reachable yet: {}", url, e),
            }
            sleep(self.interval).await;
        }

        ReadinessOutcome::TimedOut { url }
    }
}

impl Default for ReadinessProber {
    fn default() -> Self {
        Self::new(INSTALL_PATH, DEFAULT_MAX_WAIT, DEFAULT_PROBE_INTERVAL)
    }
}

/// Checks whether WordPress on `host` has come up
///
/// Fails with [`stack_core::DeployError::ReadinessTimeout`] if the
/// installer's welcome text is not seen within `max_wait`.
pub async fn check_wordpress<F>(
    fetcher: &F,
    host: &str,
    max_wait: Duration,
    interval: Duration,
) -> Result<()>
where
    F: PageFetcher + ?Sized,
{
    ReadinessProber::new(INSTALL_PATH, max_wait, interval)
        .check_ready(fetcher, host, WELCOME_TEXT)
        .await
        .into_result()
}

//! Deployer configuration
//!
//! Defines every tunable of a deployment run: the target environment, the
//! services to deploy, and the time budgets and intervals of the waits.

use std::time::Duration;

use crate::scheduler::waiter;
use crate::service::readiness;

/// Deployment configuration
///
/// All timeouts and intervals are configurable so the same sequence can be
/// run against fast local providers and slow clouds alike.
#[derive(Debug, Clone)]
pub struct Config {
    /// Juju environment to deploy into
    pub environment: String,

    /// Juju executable
    pub juju_bin: String,

    /// Bootstrap constraints (e.g. "mem=2G")
    pub constraints: String,

    /// Front-end service, exposed and probed over HTTP
    pub app_service: String,

    /// Database service related to the front-end
    pub db_service: String,

    /// Time budget for all agents to reach "started"
    pub converge_timeout: Duration,

    /// Delay between status fetches
    pub status_interval: Duration,

    /// Time budget for the readiness probe
    pub ready_timeout: Duration,

    /// Delay between readiness probes
    pub probe_interval: Duration,

    /// Timeout of a single readiness request
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a configuration for `environment` with defaults
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            juju_bin: "juju".to_string(),
            constraints: "mem=2G".to_string(),
            app_service: "wordpress".to_string(),
            db_service: "mysql".to_string(),
            converge_timeout: waiter::DEFAULT_MAX_WAIT,
            status_interval: waiter::DEFAULT_POLL_INTERVAL,
            ready_timeout: readiness::DEFAULT_MAX_WAIT,
            probe_interval: readiness::DEFAULT_PROBE_INTERVAL,
            request_timeout: stack_client::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Unit whose public address is probed
    pub fn designated_unit(&self) -> String {
        format!("{}/0", self.app_service)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.environment.is_empty() {
            anyhow::bail!("environment cannot be empty");
        }

        if self.juju_bin.is_empty() {
            anyhow::bail!("juju_bin cannot be empty");
        }

        if self.app_service.is_empty() || self.db_service.is_empty() {
            anyhow::bail!("service names cannot be empty");
        }

        if self.app_service == self.db_service {
            anyhow::bail!("app_service and db_service must differ");
        }

        if self.converge_timeout.is_zero() || self.ready_timeout.is_zero() {
            anyhow::bail!("timeouts must be greater than 0");
        }

        if self.status_interval.is_zero() || self.probe_interval.is_zero() {
            anyhow::bail!("poll intervals must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("local")
    }
}

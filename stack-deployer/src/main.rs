//! Stack Deployer
//!
//! Deploys a WordPress + MySQL stack into a Juju environment and checks
//! that it comes up.
//!
//! Architecture:
//! - Configuration: command-line flags with environment fallbacks
//! - Juju: the `juju` CLI as the orchestration collaborator
//! - Scheduler: bounded polling and the wait for agents to start
//! - Services: the deployment sequence and the HTTP readiness probe
//!
//! Exits 0 once the WordPress installer answers, 1 on any failure.

mod config;
mod juju;
mod scheduler;
mod service;
mod sinks;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use stack_client::PageClient;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::juju::JujuCli;
use crate::service::deploy_stack;
use crate::sinks::ConsoleSink;

#[derive(Parser)]
#[command(name = "deploy-stack")]
#[command(about = "Deploy a WordPress stack with Juju and wait for it to come up", long_about = None)]
struct Cli {
    /// Juju environment to deploy into
    environment: String,

    /// Juju executable
    #[arg(long, env = "DEPLOY_STACK_JUJU", default_value = "juju")]
    juju_bin: String,

    /// Bootstrap constraints
    #[arg(long, env = "DEPLOY_STACK_CONSTRAINTS", default_value = "mem=2G")]
    constraints: String,

    /// Front-end service
    #[arg(long, env = "DEPLOY_STACK_APP_SERVICE", default_value = "wordpress")]
    app_service: String,

    /// Database service
    #[arg(long, env = "DEPLOY_STACK_DB_SERVICE", default_value = "mysql")]
    db_service: String,

    /// Seconds to wait for all agents to start
    #[arg(long, env = "DEPLOY_STACK_CONVERGE_TIMEOUT", default_value_t = 300)]
    converge_timeout: u64,

    /// Seconds between status checks
    #[arg(long, env = "DEPLOY_STACK_STATUS_INTERVAL", default_value_t = 1)]
    status_interval: u64,

    /// Seconds to wait for the installer page
    #[arg(long, env = "DEPLOY_STACK_READY_TIMEOUT", default_value_t = 30)]
    ready_timeout: u64,

    /// Seconds between installer page probes
    #[arg(long, env = "DEPLOY_STACK_PROBE_INTERVAL", default_value_t = 1)]
    probe_interval: u64,

    /// Seconds before a single probe request is abandoned
    #[arg(long, env = "DEPLOY_STACK_REQUEST_TIMEOUT", default_value_t = 10)]
    request_timeout: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            environment: self.environment,
            juju_bin: self.juju_bin,
            constraints: self.constraints,
            app_service: self.app_service,
            db_service: self.db_service,
            converge_timeout: Duration::from_secs(self.converge_timeout),
            status_interval: Duration::from_secs(self.status_interval),
            ready_timeout: Duration::from_secs(self.ready_timeout),
            probe_interval: Duration::from_secs(self.probe_interval),
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Diagnostics on stderr, progress on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stack_deployer=info,stack_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli.into_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: environment={}, juju={}",
        config.environment, config.juju_bin
    );

    let juju = JujuCli::new(config.environment.clone()).with_binary(config.juju_bin.clone());
    let client = PageClient::with_timeout(config.request_timeout);
    let mut sink = ConsoleSink::new();

    deploy_stack(&juju, &client, &mut sink, &config).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["deploy-stack", "staging"]).unwrap();
        let config = cli.into_config();

        assert_eq!(config.environment, "staging");
        assert_eq!(config.juju_bin, "juju");
        assert_eq!(config.converge_timeout, Duration::from_secs(300));
        assert_eq!(config.ready_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "deploy-stack",
            "prod",
            "--app-service",
            "ghost",
            "--converge-timeout",
            "600",
            "--probe-interval",
            "2",
        ])
        .unwrap();
        let config = cli.into_config();

        assert_eq!(config.app_service, "ghost");
        assert_eq!(config.designated_unit(), "ghost/0");
        assert_eq!(config.converge_timeout, Duration::from_secs(600));
        assert_eq!(config.probe_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_environment_is_required() {
        assert!(Cli::try_parse_from(["deploy-stack"]).is_err());
    }
}

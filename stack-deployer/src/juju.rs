//! Juju command-line wrapper
//!
//! Runs `juju` subcommands against one environment:
//! - Building the full argument vector (`juju <command> -e <env> <args...>`)
//! - Echoing each command to the progress sink before it runs
//! - Failing on a non-zero exit status
//! - Reading and parsing `juju status`

use async_trait::async_trait;
use stack_core::{DeployError, ProgressSink, Result, StatusSnapshot};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Source of cluster status snapshots
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches a fresh status snapshot
    async fn get_status(&self) -> Result<StatusSnapshot>;
}

/// Orchestration collaborator
///
/// Runs commands against an environment and reports its status.
#[async_trait]
pub trait Orchestrator: StatusSource {
    /// Runs a command to completion, failing on a non-zero exit
    ///
    /// # Arguments
    /// * `command` - Subcommand (e.g. "deploy")
    /// * `args` - Extra positional arguments
    /// * `sink` - Receives the full command line before it runs
    async fn juju(&self, command: &str, args: &[&str], sink: &mut dyn ProgressSink) -> Result<()>;
}

/// [`Orchestrator`] backed by the `juju` binary
#[derive(Debug, Clone)]
pub struct JujuCli {
    environment: String,
    binary: String,
}

impl JujuCli {
    /// Creates a wrapper for the given environment using `juju` from `PATH`
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            binary: "juju".to_string(),
        }
    }

    /// Uses a different executable in place of `juju`
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Full argument vector for a command, program name first
    pub fn full_args(&self, command: &str, args: &[&str]) -> Vec<String> {
        let mut full = vec![
            self.binary.clone(),
            command.to_string(),
            "-e".to_string(),
            self.environment.clone(),
        ];
        full.extend(args.iter().map(|arg| arg.to_string()));
        full
    }

    /// Runs a full argument vector and captures its output
    ///
    /// A non-zero exit is returned as [`DeployError::CommandFailed`].
    async fn run(&self, full: &[String]) -> Result<Output> {
        let command_line = full.join(" ");
        debug!("Running {}", command_line);

        let output = Command::new(&full[0])
            .args(&full[1..])
            .output()
            .await
            .map_err(|source| DeployError::CommandSpawn {
                command: command_line.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", full[1], stderr.trim());
        }

        if !output.status.success() {
            error!(
                "Command failed: {} (exit_code={:?})",
                command_line,
                output.status.code()
            );
            return Err(DeployError::CommandFailed {
                command: command_line,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl StatusSource for JujuCli {
    async fn get_status(&self) -> Result<StatusSnapshot> {
        let output = self.run(&self.full_args("status", &[])).await?;
        StatusSnapshot::from_yaml(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl Orchestrator for JujuCli {
    async fn juju(&self, command: &str, args: &[&str], sink: &mut dyn ProgressSink) -> Result<()> {
        let full = self.full_args(command, args);
        sink.command(&full);

        let output = self.run(&full).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{} stdout: {}", command, stdout.trim());
        }
        info!("juju {} completed", command);

        Ok(())
    }
}

//! Deployment sequence
//!
//! Bootstraps the environment, deploys and relates the two services,
//! exposes the front-end, then waits for convergence and probes the
//! front-end over HTTP. The first failing step aborts the run; nothing is
//! rolled back.

use stack_client::PageFetcher;
use stack_core::{ProgressSink, Result};
use tracing::info;

use super::readiness::check_wordpress;
use crate::config::Config;
use crate::juju::Orchestrator;
use crate::scheduler::ConvergenceWaiter;

/// Deploys the two-tier stack described by `config`
///
/// # Arguments
/// * `orchestrator` - Runs commands against the target environment
/// * `fetcher` - Fetches the front-end's installer page
/// * `sink` - Receives echoed commands and pending-state summaries
/// * `config` - Services, constraints and time budgets
pub async fn deploy_stack<O, F>(
    orchestrator: &O,
    fetcher: &F,
    sink: &mut dyn ProgressSink,
    config: &Config,
) -> Result<()>
where
    O: Orchestrator + ?Sized,
    F: PageFetcher + ?Sized,
{
    let app = config.app_service.as_str();
    let db = config.db_service.as_str();

    info!("Deploying {} + {} into {}", app, db, config.environment);

    orchestrator
        .juju("bootstrap", &["--constraints", config.constraints.as_str()], sink)
        .await?;
    orchestrator.juju("deploy", &[app], sink).await?;
    orchestrator.juju("deploy", &[db], sink).await?;
    orchestrator.juju("add-relation", &[db, app], sink).await?;
    orchestrator.juju("expose", &[app], sink).await?;

    let status = ConvergenceWaiter::new(config.converge_timeout, config.status_interval)
        .wait_for_started(orchestrator, sink)
        .await?
        .into_result()?;

    let unit = config.designated_unit();
    let host = status.public_address(app, &unit)?;
    info!("{} is at {}", unit, host);

    check_wordpress(fetcher, host, config.ready_timeout, config.probe_interval).await?;

    info!("Stack deployed in {}", config.environment);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::juju::StatusSource;
    use crate::service::readiness::WELCOME_TEXT;
    use crate::service::readiness::tests::ScriptedFetcher;
    use async_trait::async_trait;
    use stack_core::{DeployError, MemorySink, StatusSnapshot};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records commands, optionally failing one, and serves fixed statuses
    struct FakeJuju {
        fail_on: Option<&'static str>,
        statuses: Vec<&'static str>,
        commands: Mutex<Vec<String>>,
        fetches: Mutex<usize>,
    }

    impl FakeJuju {
        fn new(statuses: Vec<&'static str>) -> Self {
            Self {
                fail_on: None,
                statuses,
                commands: Mutex::new(Vec::new()),
                fetches: Mutex::new(0),
            }
        }

        fn failing_on(mut self, command: &'static str) -> Self {
            self.fail_on = Some(command);
            self
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StatusSource for FakeJuju {
        async fn get_status(&self) -> Result<StatusSnapshot> {
            let mut fetches = self.fetches.lock().unwrap();
            let doc = self.statuses[(*fetches).min(self.statuses.len() - 1)];
            *fetches += 1;
            StatusSnapshot::from_yaml(doc)
        }
    }

    #[async_trait]
    impl Orchestrator for FakeJuju {
        async fn juju(
            &self,
            command: &str,
            args: &[&str],
            sink: &mut dyn ProgressSink,
        ) -> Result<()> {
            let mut line = vec![command.to_string()];
            line.extend(args.iter().map(|arg| arg.to_string()));
            sink.command(&line);
            self.commands.lock().unwrap().push(line.join(" "));

            if self.fail_on == Some(command) {
                return Err(DeployError::CommandFailed {
                    command: line.join(" "),
                    code: Some(1),
                    stderr: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    const PENDING: &str = r#"
machines:
  "0": {agent-state: started}
services:
  wordpress:
    units:
      wordpress/0: {agent-state: pending}
"#;

    const STARTED: &str = r#"
machines:
  "0": {agent-state: started}
  "1": {agent-state: started}
services:
  mysql:
    units:
      mysql/0: {agent-state: started, public-address: db.example.com}
  wordpress:
    units:
      wordpress/0: {agent-state: started, public-address: wp.example.com}
"#;

    const NO_ADDRESS: &str = r#"
machines:
  "0": {agent-state: started}
services:
  wordpress:
    units:
      wordpress/0: {agent-state: started}
"#;

    const ERRORED: &str = r#"
machines:
  "0": {agent-state: started}
services:
  wordpress:
    units:
      wordpress/0: {agent-state: hook-error}
"#;

    fn config() -> Config {
        let mut config = Config::new("staging");
        config.converge_timeout = Duration::from_secs(10);
        config.ready_timeout = Duration::from_secs(5);
        config
    }

    fn welcome_fetcher() -> ScriptedFetcher {
        ScriptedFetcher::new(vec![Ok(format!("<h1>{}</h1>", WELCOME_TEXT))])
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_sequence() {
        let juju = FakeJuju::new(vec![PENDING, STARTED]);
        let fetcher = welcome_fetcher();
        let mut sink = MemorySink::new();

        deploy_stack(&juju, &fetcher, &mut sink, &config())
            .await
            .unwrap();

        assert_eq!(
            juju.commands(),
            [
                "bootstrap --constraints mem=2G",
                "deploy wordpress",
                "deploy mysql",
                "add-relation mysql wordpress",
                "expose wordpress",
            ]
        );
        assert_eq!(sink.commands, juju.commands());
        assert_eq!(sink.pending, ["pending: wordpress/0", ""]);
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            ["http://wp.example.com/wp-admin/install.php"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_command_aborts_sequence() {
        let juju = FakeJuju::new(vec![STARTED]).failing_on("add-relation");
        let fetcher = welcome_fetcher();
        let mut sink = MemorySink::new();

        let err = deploy_stack(&juju, &fetcher, &mut sink, &config())
            .await
            .unwrap_err();

        assert!(err.is_command_failure());
        assert_eq!(juju.commands().len(), 4);
        assert_eq!(*juju.fetches.lock().unwrap(), 0);
        assert_eq!(fetcher.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errored_unit_skips_probe() {
        let juju = FakeJuju::new(vec![ERRORED]);
        let fetcher = welcome_fetcher();
        let mut sink = MemorySink::new();

        let err = deploy_stack(&juju, &fetcher, &mut sink, &config())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::ErroredUnit { ref entity, ref state }
                if entity == "wordpress/0" && state == "hook-error"
        ));
        assert_eq!(fetcher.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_convergence_timeout() {
        let juju = FakeJuju::new(vec![PENDING]);
        let fetcher = welcome_fetcher();
        let mut sink = MemorySink::new();

        let err = deploy_stack(&juju, &fetcher, &mut sink, &config())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::ConvergenceTimeout { .. }));
        assert_eq!(*juju.fetches.lock().unwrap(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_public_address() {
        let juju = FakeJuju::new(vec![NO_ADDRESS]);
        let fetcher = welcome_fetcher();
        let mut sink = MemorySink::new();

        let err = deploy_stack(&juju, &fetcher, &mut sink, &config())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::MissingAddress { ref unit } if unit == "wordpress/0"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_readiness_timeout() {
        let juju = FakeJuju::new(vec![STARTED]);
        let fetcher = ScriptedFetcher::default();
        let mut sink = MemorySink::new();

        let err = deploy_stack(&juju, &fetcher, &mut sink, &config())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(fetcher.attempts(), 5);
    }
}

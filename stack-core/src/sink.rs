//! Progress reporting
//!
//! Operator-facing progress lines are written to an injected sink rather
//! than straight to stdout, so waits and deployments can be observed in
//! tests.

/// Destination for progress lines
pub trait ProgressSink: Send {
    /// Records an orchestration command about to run
    fn command(&mut self, args: &[String]);

    /// Records the pending-state summary of one poll tick
    fn pending(&mut self, summary: &str);
}

/// Sink that keeps every line in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub commands: Vec<String>,
    pub pending: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for MemorySink {
    fn command(&mut self, args: &[String]) {
        self.commands.push(args.join(" "));
    }

    fn pending(&mut self, summary: &str) {
        self.pending.push(summary.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_lines() {
        let mut sink = MemorySink::new();
        sink.command(&["juju".to_string(), "status".to_string()]);
        sink.pending("pending: mysql/0");
        sink.pending("");

        assert_eq!(sink.commands, ["juju status"]);
        assert_eq!(sink.pending, ["pending: mysql/0", ""]);
    }
}

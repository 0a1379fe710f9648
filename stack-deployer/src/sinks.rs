//! Console progress sink
//!
//! Writes progress lines to stdout and flushes after each one so they are
//! visible immediately, even if the process is killed mid-wait.

use stack_core::ProgressSink;
use std::io::{self, Stdout, Write};
use tracing::warn;

/// Line-oriented [`ProgressSink`] over any writer
pub struct ConsoleSink<W: Write + Send = Stdout> {
    out: W,
}

impl ConsoleSink {
    /// Creates a sink writing to stdout
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Creates a sink writing to `out`
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        let result = writeln!(self.out, "{}", line).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to write progress line: {}", e);
        }
    }
}

impl<W: Write + Send> ProgressSink for ConsoleSink<W> {
    fn command(&mut self, args: &[String]) {
        self.write_line(&args.join(" "));
    }

    fn pending(&mut self, summary: &str) {
        self.write_line(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_written_in_order() {
        let mut sink = ConsoleSink::with_writer(Vec::new());
        sink.command(&[
            "juju".to_string(),
            "deploy".to_string(),
            "-e".to_string(),
            "staging".to_string(),
            "mysql".to_string(),
        ]);
        sink.pending("pending: mysql/0");
        sink.pending("");

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "juju deploy -e staging mysql\npending: mysql/0\n\n");
    }
}

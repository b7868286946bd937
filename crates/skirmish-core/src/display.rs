//! Display sinks: where human-readable run lines go.
//!
//! The simulation never prints directly. Every line (step headers, one line
//! per command transition, the outcome and the undo trace) is handed to a
//! [`DisplaySink`] passed in by the caller.

use std::io::Write;

/// Direction of a command transition being described.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The command was just executed.
    Forward,
    /// The command was just undone.
    Reverse,
}

/// Consumer of human-readable lines.
pub trait DisplaySink {
    /// Receives one complete line, without trailing newline.
    fn line(&mut self, text: &str);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn line(&mut self, _text: &str) {}
}

/// Collects lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the sink and returns its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl DisplaySink for MemorySink {
    fn line(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}

/// Writes each line to an [`std::io::Write`] target.
///
/// Write failures are logged and otherwise ignored; display is cosmetic and
/// must not change the outcome of a run.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DisplaySink for WriterSink<W> {
    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.writer, "{text}") {
            tracing::warn!(%err, "display sink write failed");
        }
    }
}

//! The `LogWriter` trait implemented by log sinks.

use crate::{LogLine, LogResult};

/// An append-only sink for log lines.
///
/// Errors are returned to the caller; [`PerceptionRecorder`] logs them and
/// keeps going, so a failing sink never stops the simulation.
///
/// [`PerceptionRecorder`]: crate::PerceptionRecorder
pub trait LogWriter {
    /// Append one line.  Lines must reach the sink in call order.
    fn append(&mut self, line: &LogLine) -> LogResult<()>;

    /// Flush and close any open handle.  Idempotent.
    fn finish(&mut self) -> LogResult<()>;
}

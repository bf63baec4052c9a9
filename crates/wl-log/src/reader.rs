//! Reading perception logs back.
//!
//! The writer may be mid-append while a reader looks at the file, so only
//! newline-terminated lines count.  An unterminated tail is left alone until
//! a later read sees its newline.

use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use crate::{LogLine, LogResult};

/// Outcome of [`parse_complete`].
#[derive(Debug, Default)]
pub struct ParsedLines {
    pub lines:     Vec<LogLine>,
    /// Bytes up to and including the last newline.
    pub consumed:  usize,
    /// Complete lines that failed to parse and were skipped.
    pub malformed: usize,
}

/// Parse every complete line in `buf`.
///
/// Blank lines are ignored.  Malformed lines are skipped with a warning.
pub fn parse_complete(buf: &[u8]) -> ParsedLines {
    let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
        return ParsedLines::default();
    };
    let complete = &buf[..=last_newline];

    let mut parsed = ParsedLines { consumed: complete.len(), ..ParsedLines::default() };
    for (index, raw) in complete.split(|&b| b == b'\n').enumerate() {
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text.trim(),
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping non-UTF-8 log line");
                parsed.malformed += 1;
                continue;
            }
        };
        if text.is_empty() {
            continue;
        }
        match LogLine::parse(text) {
            Ok(line) => parsed.lines.push(line),
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping malformed log line");
                parsed.malformed += 1;
            }
        }
    }
    parsed
}

/// Every complete line of one day's log, or `None` if the file does not exist.
pub fn read_day(path: &Path) -> LogResult<Option<Vec<LogLine>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(parse_complete(&bytes).lines)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The last `count` lines of a log; empty if the file does not exist.
pub fn read_recent(path: &Path, count: usize) -> LogResult<Vec<LogLine>> {
    let mut lines = read_day(path)?.unwrap_or_default();
    let skip = lines.len().saturating_sub(count);
    lines.drain(..skip);
    Ok(lines)
}

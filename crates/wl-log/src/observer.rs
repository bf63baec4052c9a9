//! `PerceptionRecorder<W>`: bridges `SimObserver` to a `LogWriter`.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use wl_core::Tick;
use wl_sim::{Sample, SimObserver};

use crate::{LogError, LogLine, LogResult, LogWriter, PerceptionRecord, ScreenshotRecord};

/// A [`SimObserver`] that turns every sample into a [`PerceptionRecord`] and
/// appends it to a [`LogWriter`].
///
/// A failed append is logged and counted but never stops the run; the next
/// sample tries again.  The first error is kept for
/// [`take_error`][Self::take_error].
pub struct PerceptionRecorder<W: LogWriter> {
    writer:     W,
    weather:    Option<String>,
    echo:       bool,
    written:    u64,
    failures:   u64,
    last_error: Option<LogError>,
}

impl<W: LogWriter> PerceptionRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            weather: Some("rainy".to_string()),
            echo: true,
            written: 0,
            failures: 0,
            last_error: None,
        }
    }

    /// Weather label stamped on every record; `None` omits the field.
    pub fn with_weather(mut self, weather: Option<String>) -> Self {
        self.weather = weather;
        self
    }

    /// Echo each record as an `info!` line.  Default: on.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Build the record for a sample.
    pub fn capture(&self, sample: &Sample<'_>) -> PerceptionRecord {
        PerceptionRecord {
            t:        sample.at,
            pos:      sample.position.rounded(),
            district: sample.sense.district.to_string(),
            activity: sample.activity().unwrap_or_default().to_string(),
            ground:   sample.sense.ground,
            mood:     sample.sense.mood.to_string(),
            weather:  self.weather.clone(),
        }
    }

    /// Append a perception record.
    pub fn record(&mut self, record: PerceptionRecord) {
        if self.echo {
            info!(
                "[{}] {}: {}, {}, {}",
                record.t.to_rfc3339(),
                record.district,
                record.activity,
                record.mood,
                record.ground
            );
        }
        let result = self.writer.append(&LogLine::Perception(record));
        self.store(result, "perception");
    }

    /// Append a screenshot marker referencing `file`.
    pub fn record_screenshot(&mut self, file: &str, at: DateTime<Utc>) {
        info!(file, "screenshot captured");
        let line = LogLine::Screenshot(ScreenshotRecord { t: at, file: file.to_string() });
        let result = self.writer.append(&line);
        self.store(result, "screenshot");
    }

    /// Records successfully appended.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Appends that failed.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<LogError> {
        self.last_error.take()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store(&mut self, result: LogResult<()>, kind: &str) {
        match result {
            Ok(()) => self.written += 1,
            Err(e) => {
                self.failures += 1;
                warn!(kind, error = %e, "failed to append log line");
                // Keep only the first error.
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
            }
        }
    }
}

impl<W: LogWriter> SimObserver for PerceptionRecorder<W> {
    fn on_sample(&mut self, sample: &Sample<'_>) {
        let record = self.capture(sample);
        self.record(record);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        if let Err(e) = result {
            warn!(error = %e, "failed to close log file");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

//! Log line types.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use wl_core::Point;
use wl_zones::Ground;

use crate::{LogError, LogResult};

/// One timestamped snapshot of the agent and its surroundings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptionRecord {
    pub t:        DateTime<Utc>,
    /// Position rounded to one decimal place.
    pub pos:      Point,
    pub district: String,
    pub activity: String,
    pub ground:   Ground,
    pub mood:     String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather:  Option<String>,
}

/// A reference to a captured image, interleaved with perceptions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "screenshot")]
pub struct ScreenshotRecord {
    pub t:    DateTime<Utc>,
    pub file: String,
}

/// Any line of a perception log.
///
/// Parsing is discriminated by the `type` field: absent (or `null`) means a
/// perception, `"screenshot"` means a marker, anything else is malformed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogLine {
    Perception(PerceptionRecord),
    Screenshot(ScreenshotRecord),
}

impl LogLine {
    pub fn t(&self) -> DateTime<Utc> {
        match self {
            LogLine::Perception(p) => p.t,
            LogLine::Screenshot(s) => s.t,
        }
    }

    pub fn as_perception(&self) -> Option<&PerceptionRecord> {
        match self {
            LogLine::Perception(p) => Some(p),
            LogLine::Screenshot(_) => None,
        }
    }

    pub fn as_screenshot(&self) -> Option<&ScreenshotRecord> {
        match self {
            LogLine::Screenshot(s) => Some(s),
            LogLine::Perception(_) => None,
        }
    }

    /// Parse one line (without its trailing newline).
    pub fn parse(line: &str) -> LogResult<Self> {
        Self::from_value(serde_json::from_str(line)?)
    }

    pub fn from_value(value: Value) -> LogResult<Self> {
        let kind = match value.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(kind)) => Some(kind.clone()),
            Some(other) => return Err(LogError::Parse(format!("non-string record type {other}"))),
        };
        match kind.as_deref() {
            None => Ok(LogLine::Perception(serde_json::from_value(value)?)),
            Some("screenshot") => Ok(LogLine::Screenshot(serde_json::from_value(value)?)),
            Some(kind) => Err(LogError::Parse(format!("unknown record type {kind:?}"))),
        }
    }

    /// Serialize as one JSON line, newline included.
    pub fn to_line(&self) -> LogResult<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

impl<'de> Deserialize<'de> for LogLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        LogLine::from_value(value).map_err(D::Error::custom)
    }
}

impl From<PerceptionRecord> for LogLine {
    fn from(record: PerceptionRecord) -> Self {
        LogLine::Perception(record)
    }
}

impl From<ScreenshotRecord> for LogLine {
    fn from(record: ScreenshotRecord) -> Self {
        LogLine::Screenshot(record)
    }
}

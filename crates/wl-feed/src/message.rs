//! Messages pushed to live subscribers.

use serde::{Deserialize, Serialize};

use wl_log::{LogLine, PerceptionRecord};

/// One WebSocket text frame, discriminated by `type`:
///
/// ```text
/// {"type":"history","perceptions":[…]}      once, on connect
/// {"type":"perception","perception":{…}}    per new perception line
/// {"type":"screenshot","filename":"…"}      per new screenshot marker
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedMessage {
    History { perceptions: Vec<LogLine> },
    Perception { perception: PerceptionRecord },
    Screenshot { filename: String },
}

impl FeedMessage {
    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<LogLine> for FeedMessage {
    fn from(line: LogLine) -> Self {
        match line {
            LogLine::Perception(perception) => FeedMessage::Perception { perception },
            LogLine::Screenshot(marker) => FeedMessage::Screenshot { filename: marker.file },
        }
    }
}

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }

    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            self.message
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Status,
    Message,
    Error,
}

impl EventKind {
    pub fn default_icon(&self) -> &'static str {
        match self {
            EventKind::Status => "⚡",
            EventKind::Message => "💬",
            EventKind::Error => "⛔",
        }
    }
}

/// One entry of the live chat / activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub source: String,
    pub text: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub icon: String,
}

impl ActivityEvent {
    pub fn new(source: impl Into<String>, text: impl Into<String>, kind: EventKind) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            time: Local::now().format("%-I:%M:%S %p").to_string(),
            kind,
            icon: kind.default_icon().to_string(),
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

//! Activity log entries

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Ordinary progress report
    Info,
    /// Something unexpected that the task can recover from
    Warning,
    /// A failure the operator should look at
    Error,
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One immutable, timestamped message in an activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    tier: Tier,
    time: DateTime<Utc>,
    text: String,
}

impl Entry {
    /// Create an entry, e.g. to copy history into another log with
    /// [`Log::insert`](crate::Log::insert)
    pub fn new(tier: Tier, time: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            tier,
            time,
            text: text.into(),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// When the entry was logged
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

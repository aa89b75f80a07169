//! Thread model returned by the `query/` endpoint

use serde::{Deserialize, Serialize};

/// Opaque backend identifier for a thread
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One row of a search result: a conversation snapshot
///
/// Text fields may be absent or `null` in the payload; they render as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: ThreadId,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    /// Date of the newest message, in seconds since the Unix epoch;
    /// backends may send it with a fractional part
    #[serde(default)]
    pub newest_date: Option<f64>,
}

impl Thread {
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }

    pub fn authors(&self) -> &str {
        self.authors.as_deref().unwrap_or_default()
    }

    /// Newest date in whole seconds, rounded toward the past
    pub fn newest_date_secs(&self) -> Option<i64> {
        self.newest_date
            .filter(|secs| secs.is_finite())
            .map(|secs| secs.floor() as i64)
    }
}

//! UTC timestamps for session activity and record lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time, always UTC. Orders chronologically, which the listing sort relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wraps a value read back from storage.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Wire format for `lastMessageTime`.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

//! Recent-selection log
//!
//! A bounded, most-recent-first list of picked prompts, unique by title and
//! written back to host storage on every call.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{errors::Result, state::StateStore};

/// Storage key holding the list
pub const RECENT_KEY: &str = "recentSelections";

/// Entries kept after truncation
pub const MAX_RECENT: usize = 100;

/// One past pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSelection {
    pub title:     String,
    /// Slug of the record when it was picked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug:      Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

pub struct RecentLog {
    storage: Box<dyn StateStore>,
    limit:   usize,
}

impl RecentLog {
    pub fn new(storage: Box<dyn StateStore>) -> Self {
        Self::with_limit(storage, MAX_RECENT)
    }

    /// `limit` is clamped to `1..=MAX_RECENT`
    pub fn with_limit(storage: Box<dyn StateStore>, limit: usize) -> Self {
        Self {
            storage,
            limit: limit.clamp(1, MAX_RECENT),
        }
    }

    /// Move `title` to the front with the current time
    pub fn record(&mut self, title: &str, slug: Option<&str>) -> Result<()> {
        self.record_at(title, slug, Utc::now().timestamp_millis())
    }

    pub fn record_at(&mut self, title: &str, slug: Option<&str>, timestamp: i64) -> Result<()> {
        let mut entries = self.list();
        entries.retain(|entry| entry.title != title);
        entries.insert(
            0,
            RecentSelection {
                title: title.to_string(),
                slug: slug.map(str::to_string),
                timestamp,
            },
        );
        entries.truncate(self.limit);

        self.storage
            .set(RECENT_KEY, serde_json::to_value(&entries)?)
    }

    /// Stored entries, most recent first
    ///
    /// Unreadable or malformed state reads as an empty list.
    pub fn list(&self) -> Vec<RecentSelection> {
        let value = match self.storage.get(RECENT_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read recent selections");
                return Vec::new();
            },
        };

        serde_json::from_value(value).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring malformed recent selections");
            Vec::new()
        })
    }
}

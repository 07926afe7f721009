//! Event catalogue types.
//!
//! The mirror publishes two catalogue documents: event metadata keyed by
//! event id, and the list of story chapters for each event. Both are
//! keyed by stringified integers, which deserialize straight into `u32`
//! map keys.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::region::Region;

/// Event metadata, keyed by event id.
pub type EventCatalogue = BTreeMap<u32, EventInfo>;

/// Story chapters, keyed by event id.
pub type StoryCatalogue = BTreeMap<u32, EventStories>;

// ============================================================================
// Localized values
// ============================================================================

/// A value published once per region, `null` where the region does not
/// have it (yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized<T>(pub Vec<Option<T>>);

impl<T> Localized<T> {
    /// Returns the value for `region`, if published.
    #[must_use]
    pub fn get(&self, region: Region) -> Option<&T> {
        self.0.get(region.index()).and_then(Option::as_ref)
    }
}

// ============================================================================
// Events
// ============================================================================

/// Metadata for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    /// Localized event name.
    #[serde(default)]
    pub event_name: Localized<String>,

    /// Asset bundle directory name; also the cache directory for the
    /// event's chapters.
    pub asset_bundle_name: String,

    /// Localized start time as a millisecond epoch string.
    #[serde(default)]
    pub start_at: Localized<String>,
}

impl EventInfo {
    /// Event name in `region`.
    #[must_use]
    pub fn name(&self, region: Region) -> Option<&str> {
        self.event_name.get(region).map(String::as_str)
    }

    /// Start time in `region`, if published and well-formed.
    #[must_use]
    pub fn start(&self, region: Region) -> Option<DateTime<Utc>> {
        let millis = self.start_at.get(region)?.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    /// Whether the event has opened in `region` as of `now`.
    #[must_use]
    pub fn has_started(&self, region: Region, now: DateTime<Utc>) -> bool {
        self.start(region).is_some_and(|start| now >= start)
    }
}

// ============================================================================
// Stories
// ============================================================================

/// The chapters of one event story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStories {
    /// Chapters in reading order.
    #[serde(default)]
    pub stories: Vec<StoryChapter>,
}

/// One chapter of an event story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryChapter {
    /// Scenario asset id, e.g. `event12-03`.
    pub scenario_id: String,

    /// Localized caption, e.g. "Chapter 3".
    #[serde(default)]
    pub caption: Localized<String>,

    /// Localized chapter title.
    #[serde(default)]
    pub title: Localized<String>,
}

//! `list` command handler
//!
//! Lists events from the mirror's catalogue for one region.

use std::path::Path;

use bestdori_epub_core::{EventCatalogue, Region};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::settings_for_source;
use crate::error::AppError;
use crate::fetch::{Endpoints, HttpSource, fetch_events};

/// One line of `list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventListing {
    /// Event id.
    pub id: u32,
    /// Name in the region, if published.
    pub name: Option<String>,
    /// Start time in the region, if published.
    pub start: Option<DateTime<Utc>>,
    /// Whether the event has started.
    pub started: bool,
}

/// List events.
///
/// # Errors
///
/// Returns a configuration or fetch error.
pub async fn run(args: &ListArgs, config: Option<&Path>) -> Result<(), AppError> {
    let settings = settings_for_source(config, &args.source)?;
    let now = args.source.now.unwrap_or_else(Utc::now);

    let source = HttpSource::new(settings.timeout()?)?;
    let endpoints = Endpoints::new(settings.base_url(), settings.region);
    let events = fetch_events(&source, &endpoints).await?;

    let listings = listings(&events, settings.region, now, args.all);

    match args.format {
        OutputFormat::Human => {
            for listing in &listings {
                let start = listing
                    .start
                    .map_or_else(|| "-".to_string(), |s| s.format("%Y-%m-%d").to_string());
                println!(
                    "{:>4}  {start:<10}  {}",
                    listing.id,
                    listing.name.as_deref().unwrap_or("(unnamed)")
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
    }
    Ok(())
}

/// Catalogue entries as listings, started events only unless `all`.
#[must_use]
pub fn listings(
    events: &EventCatalogue,
    region: Region,
    now: DateTime<Utc>,
    all: bool,
) -> Vec<EventListing> {
    events
        .iter()
        .map(|(&id, event)| EventListing {
            id,
            name: event.name(region).map(str::to_string),
            start: event.start(region),
            started: event.has_started(region, now),
        })
        .filter(|listing| all || listing.started)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &str = r#"{
        "1": {"eventName": [null, "Past"], "assetBundleName": "a", "startAt": [null, "1000"]},
        "2": {"eventName": [null, "Future"], "assetBundleName": "b", "startAt": [null, "9000"]},
        "3": {"eventName": ["JP"], "assetBundleName": "c", "startAt": ["1000"]}
    }"#;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(5000).unwrap()
    }

    #[test]
    fn test_started_only() {
        let events: EventCatalogue = serde_json::from_str(EVENTS).unwrap();
        let listed = listings(&events, Region::En, now(), false);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 1);
        assert_eq!(listed[0].name.as_deref(), Some("Past"));
    }

    #[test]
    fn test_all() {
        let events: EventCatalogue = serde_json::from_str(EVENTS).unwrap();
        let listed = listings(&events, Region::En, now(), true);
        assert_eq!(listed.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!listed[1].started);
        assert_eq!(listed[2].name, None);
        assert_eq!(listed[2].start, None);
    }

    #[test]
    fn test_region_switch() {
        let events: EventCatalogue = serde_json::from_str(EVENTS).unwrap();
        let listed = listings(&events, Region::Jp, now(), false);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 3);
    }
}

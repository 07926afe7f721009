//! Build pipeline.
//!
//! For every event that has started in the selected region: load each
//! chapter through the cache, render it, assemble the story document and
//! hand it to the converter. A failing chapter fails its story only; the
//! run moves on to the next event.

use std::collections::BTreeSet;
use std::path::PathBuf;

use bestdori_epub_core::{EventInfo, EventStories, Region};
use bestdori_epub_markdown::{Renderer, SeparatorPolicy, StoryDocument, story_file_stem};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::schema::Settings;
use crate::convert::Converter;
use crate::error::AppError;
use crate::fetch::{AssetCache, Catalogue};

/// Subdirectory of the output directory that event books go into.
pub const EVENT_STORIES_DIR: &str = "Event Stories";

// ============================================================================
// Exclusions
// ============================================================================

/// Decides which events and chapters are left out of a build.
///
/// Some upstream stories have broken or duplicated data; this is where
/// they get filtered without touching rendering.
pub trait Exclusion: Send + Sync {
    /// Whether the whole event is skipped.
    fn excludes_event(&self, event_id: u32) -> bool;

    /// Whether one chapter is left out of its story.
    fn excludes_chapter(&self, _event_id: u32, _scenario_id: &str) -> bool {
        false
    }
}

impl<F> Exclusion for F
where
    F: Fn(u32) -> bool + Send + Sync,
{
    fn excludes_event(&self, event_id: u32) -> bool {
        self(event_id)
    }
}

/// Exclusions listed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    /// Event ids to skip.
    pub events: BTreeSet<u32>,
    /// Scenario ids to leave out.
    pub scenarios: BTreeSet<String>,
}

impl ExclusionSet {
    /// The exclusions configured in `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            events: settings.exclude_events.clone(),
            scenarios: settings.exclude_scenarios.clone(),
        }
    }
}

impl Exclusion for ExclusionSet {
    fn excludes_event(&self, event_id: u32) -> bool {
        self.events.contains(&event_id)
    }

    fn excludes_chapter(&self, _event_id: u32, scenario_id: &str) -> bool {
        self.scenarios.contains(scenario_id)
    }
}

// ============================================================================
// Build context
// ============================================================================

/// Everything a build run depends on besides its collaborators.
///
/// The clock and region are plain values so a run is reproducible.
pub struct BuildContext {
    /// Events that start after this instant are not built.
    pub now: DateTime<Utc>,
    /// Region whose names and start times are used.
    pub region: Region,
    /// Scenario renderer.
    pub renderer: Renderer,
    /// Directory books are written under.
    pub output_dir: PathBuf,
    /// When non-empty, only these events are considered.
    pub only_events: BTreeSet<u32>,
    /// Events and chapters to leave out.
    pub exclusions: Box<dyn Exclusion>,
}

impl BuildContext {
    /// Context for `settings` as of `now`.
    #[must_use]
    pub fn from_settings(settings: &Settings, now: DateTime<Utc>) -> Self {
        let policy = if settings.legacy_separators {
            SeparatorPolicy::Legacy
        } else {
            SeparatorPolicy::Deduplicate
        };
        Self {
            now,
            region: settings.region,
            renderer: Renderer::new().with_separator_policy(policy),
            output_dir: settings.output_dir.clone(),
            only_events: BTreeSet::new(),
            exclusions: Box::new(ExclusionSet::from_settings(settings)),
        }
    }

    /// Restricts the run to `events` (no restriction when empty).
    #[must_use]
    pub fn with_only_events(mut self, events: impl IntoIterator<Item = u32>) -> Self {
        self.only_events = events.into_iter().collect();
        self
    }
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("now", &self.now)
            .field("region", &self.region)
            .field("renderer", &self.renderer)
            .field("output_dir", &self.output_dir)
            .field("only_events", &self.only_events)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Outcome of a build run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Books written.
    pub converted: Vec<PathBuf>,
    /// Started events that were not built, and why.
    pub skipped: Vec<SkippedStory>,
    /// Stories that failed to build or convert.
    pub failed: Vec<FailedStory>,
    /// The run stopped early on request.
    pub interrupted: bool,
}

impl BuildSummary {
    /// Stories that were attempted (converted or failed).
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// A started event that was not built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStory {
    /// Event id.
    pub event_id: u32,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Why a started event was not built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Listed in the exclusions.
    Excluded,
    /// No event name in the selected region.
    Unnamed,
    /// Missing from the story catalogue.
    NoStories,
    /// Every chapter was excluded, or there were none.
    NoChapters,
}

/// A story that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStory {
    /// Event id.
    pub event_id: u32,
    /// Error message.
    pub error: String,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Builds books from the catalogue using a cache and a converter.
pub struct Pipeline {
    ctx: BuildContext,
    cache: AssetCache,
    converter: Box<dyn Converter>,
}

impl Pipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(ctx: BuildContext, cache: AssetCache, converter: Box<dyn Converter>) -> Self {
        Self {
            ctx,
            cache,
            converter,
        }
    }

    /// Where the book for `event_id` named `name` is written.
    #[must_use]
    pub fn destination(&self, event_id: u32, name: &str) -> PathBuf {
        self.ctx.output_dir.join(EVENT_STORIES_DIR).join(format!(
            "{}.{}",
            story_file_stem(event_id, name),
            self.converter.extension()
        ))
    }

    /// Builds every eligible event in `catalogue`, in ascending id order.
    ///
    /// Story failures are recorded in the summary, not returned. `cancel`
    /// is checked between stories, so a story is never left half written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only if the output directory cannot be created.
    pub async fn run(
        &self,
        catalogue: &Catalogue,
        cancel: &CancellationToken,
    ) -> Result<BuildSummary, AppError> {
        tokio::fs::create_dir_all(self.ctx.output_dir.join(EVENT_STORIES_DIR)).await?;

        let mut summary = BuildSummary::default();

        for (&event_id, event) in &catalogue.events {
            if cancel.is_cancelled() {
                warn!(event_id, "interrupted, not starting further stories");
                summary.interrupted = true;
                break;
            }
            if !self.ctx.only_events.is_empty() && !self.ctx.only_events.contains(&event_id) {
                continue;
            }
            if !event.has_started(self.ctx.region, self.ctx.now) {
                debug!(event_id, "not started, skipping");
                continue;
            }

            let skip = |reason| {
                info!(event_id, ?reason, "skipping event");
                SkippedStory { event_id, reason }
            };

            if self.ctx.exclusions.excludes_event(event_id) {
                summary.skipped.push(skip(SkipReason::Excluded));
                continue;
            }
            let Some(name) = event.name(self.ctx.region) else {
                summary.skipped.push(skip(SkipReason::Unnamed));
                continue;
            };
            let Some(stories) = catalogue.stories.get(&event_id) else {
                warn!(event_id, "event has no story entry");
                summary.skipped.push(skip(SkipReason::NoStories));
                continue;
            };

            info!(event_id, name, "building story");

            let document = match self.build_story(event_id, event, name, stories).await {
                Ok(document) => document,
                Err(e) => {
                    error!(event_id, error = %e, "story failed");
                    summary.failed.push(FailedStory {
                        event_id,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if document.chapter_count() == 0 {
                summary.skipped.push(skip(SkipReason::NoChapters));
                continue;
            }

            let destination = self.destination(event_id, name);
            match self
                .converter
                .convert(document.as_str(), &destination)
                .await
            {
                Ok(()) => {
                    info!(event_id, path = %destination.display(), "wrote book");
                    summary.converted.push(destination);
                }
                Err(e) => {
                    error!(event_id, path = %destination.display(), error = %e, "conversion failed");
                    summary.failed.push(FailedStory {
                        event_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }

    /// Assembles the markdown document for one event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Chapter` naming the first chapter that could not
    /// be loaded or rendered.
    pub async fn build_story(
        &self,
        event_id: u32,
        event: &EventInfo,
        name: &str,
        stories: &EventStories,
    ) -> Result<StoryDocument, AppError> {
        let region = self.ctx.region;
        let mut document = StoryDocument::new(name);

        for chapter in &stories.stories {
            let scenario_id = chapter.scenario_id.as_str();
            if self.ctx.exclusions.excludes_chapter(event_id, scenario_id) {
                info!(event_id, scenario_id, "skipping excluded chapter");
                continue;
            }

            let chapter_error = |source| AppError::Chapter {
                event_id,
                scenario_id: scenario_id.to_string(),
                source,
            };

            let scenario = self
                .cache
                .load_scenario(&event.asset_bundle_name, event_id, scenario_id)
                .await
                .map_err(chapter_error)?;
            let fragment = self
                .ctx
                .renderer
                .render(&scenario)
                .map_err(|e| chapter_error(e.into()))?;

            let caption = chapter.caption.get(region).map_or(scenario_id, String::as_str);
            let title = chapter.title.get(region).map_or("", String::as_str);
            document.push_chapter(caption, title, &fragment);
        }

        Ok(document)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("ctx", &self.ctx)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

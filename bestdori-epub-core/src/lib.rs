//! `bestdori-epub` Core - shared scenario and catalogue types
//!
//! This crate provides the data model shared across `bestdori-epub`
//! (CLI and pipeline) and `bestdori-epub-markdown` (rendering).

pub mod catalogue;
pub mod error;
pub mod region;
pub mod scenario;

pub use catalogue::{
    EventCatalogue, EventInfo, EventStories, Localized, StoryCatalogue, StoryChapter,
};
pub use error::RenderError;
pub use region::Region;
pub use scenario::{
    ActionType, DialogueLine, EffectRecord, EffectType, Scenario, ScenarioAsset, Snippet,
};

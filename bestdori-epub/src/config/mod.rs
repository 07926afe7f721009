//! Settings for `bestdori-epub`
//!
//! A YAML settings file provides defaults; command-line flags and their
//! environment variables override it.

pub mod loader;
pub mod schema;

pub use loader::{load_settings, settings_for_build, settings_for_source};
pub use schema::{BookFormat, Settings};

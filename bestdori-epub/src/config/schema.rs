//! Settings schema.
//!
//! Every field has a default, so an absent or partial settings file is
//! valid. Command-line flags are applied on top by the loader.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use bestdori_epub_core::Region;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default mirror root.
pub const DEFAULT_BASE_URL: &str = "https://bestdori.com";

/// Default HTTP timeout, in humantime notation.
pub const DEFAULT_TIMEOUT: &str = "30s";

/// Resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Mirror root, without a trailing slash.
    pub base_url: String,

    /// Region whose names, start times and assets are used.
    pub region: Region,

    /// Directory for downloaded scenario JSON.
    pub cache_dir: PathBuf,

    /// Directory books are written under.
    pub output_dir: PathBuf,

    /// Artifact format.
    pub format: BookFormat,

    /// Pandoc executable.
    pub pandoc: String,

    /// Extra pandoc arguments, shell-quoted.
    pub pandoc_args: Option<String>,

    /// HTTP timeout, e.g. `30s` or `2m`.
    pub timeout: String,

    /// Event ids never built.
    pub exclude_events: BTreeSet<u32>,

    /// Scenario ids left out of their stories.
    pub exclude_scenarios: BTreeSet<String>,

    /// Reproduce the old divider placement around title cards.
    pub legacy_separators: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            region: Region::default(),
            cache_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("Stories"),
            format: BookFormat::default(),
            pandoc: "pandoc".to_string(),
            pandoc_args: None,
            timeout: DEFAULT_TIMEOUT.to_string(),
            exclude_events: BTreeSet::new(),
            exclude_scenarios: BTreeSet::new(),
            legacy_separators: false,
        }
    }
}

impl Settings {
    /// Parsed HTTP timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `timeout` is not a duration.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(self.timeout.trim()).map_err(|_| ConfigError::InvalidValue {
            field: "timeout".to_string(),
            value: self.timeout.clone(),
            expected: "a duration such as '30s' or '2m'".to_string(),
        })
    }

    /// Extra pandoc arguments, split the way a POSIX shell would.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on unbalanced quotes.
    pub fn pandoc_args(&self) -> Result<Vec<String>, ConfigError> {
        let Some(raw) = self.pandoc_args.as_deref() else {
            return Ok(Vec::new());
        };
        shlex::split(raw).ok_or_else(|| ConfigError::InvalidValue {
            field: "pandoc_args".to_string(),
            value: raw.to_string(),
            expected: "shell-quoted arguments".to_string(),
        })
    }

    /// Mirror root with any trailing slashes removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Checks every field that can be wrong without touching the network.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                expected: "an http:// or https:// URL".to_string(),
            });
        }
        if self.pandoc.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "pandoc".to_string(),
                value: self.pandoc.clone(),
                expected: "a program name or path".to_string(),
            });
        }
        self.timeout()?;
        self.pandoc_args()?;
        Ok(())
    }
}

/// Artifact written per story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    /// EPUB via pandoc.
    #[default]
    Epub,
    /// The assembled markdown, no pandoc needed.
    Markdown,
}

impl BookFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Markdown => "md",
        }
    }
}

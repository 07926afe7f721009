//! Mirror access.
//!
//! [`AssetSource`] is the seam between the pipeline and the network:
//! [`HttpSource`] talks to the real mirror, tests substitute an in-memory
//! map. [`Endpoints`] knows the mirror's URL layout.

pub mod cache;

use std::time::Duration;

use async_trait::async_trait;
use bestdori_epub_core::{EventCatalogue, Region, StoryCatalogue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;

pub use cache::AssetCache;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Sources
// ============================================================================

/// Something that can produce the text of a mirror document.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Returns the body of the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the document cannot be retrieved.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`AssetSource`] backed by HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSource {
    /// Creates an HTTP source with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl AssetSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching");

        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// URL layout
// ============================================================================

/// URL layout of the mirror for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
    region: Region,
}

impl Endpoints {
    /// Endpoints under `base` (trailing slashes are ignored).
    #[must_use]
    pub fn new(base: &str, region: Region) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            region,
        }
    }

    /// Event metadata catalogue.
    #[must_use]
    pub fn events(&self) -> String {
        format!("{}/api/events/all.5.json", self.base)
    }

    /// Event story chapter catalogue.
    #[must_use]
    pub fn event_stories(&self) -> String {
        format!("{}/api/events/all.stories.json", self.base)
    }

    /// Scenario asset for one chapter.
    #[must_use]
    pub fn scenario(&self, event_id: u32, scenario_id: &str) -> String {
        format!(
            "{}/assets/{}/scenario/eventstory/event{event_id}_rip/Scenario{scenario_id}.asset",
            self.base,
            self.region.slug()
        )
    }
}

// ============================================================================
// Catalogue
// ============================================================================

/// Both catalogue documents. Fetched fresh every run, never cached.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    /// Event metadata by id.
    pub events: EventCatalogue,
    /// Story chapters by event id.
    pub stories: StoryCatalogue,
}

impl Catalogue {
    /// Fetches both catalogue documents.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if either document cannot be fetched or parsed.
    pub async fn fetch(source: &dyn AssetSource, endpoints: &Endpoints) -> Result<Self, FetchError> {
        let events = fetch_events(source, endpoints).await?;
        let stories = fetch_json(source, &endpoints.event_stories()).await?;
        Ok(Self { events, stories })
    }
}

/// Fetches just the event metadata catalogue.
///
/// # Errors
///
/// Returns a `FetchError` if the document cannot be fetched or parsed.
pub async fn fetch_events(
    source: &dyn AssetSource,
    endpoints: &Endpoints,
) -> Result<EventCatalogue, FetchError> {
    fetch_json(source, &endpoints.events()).await
}

async fn fetch_json<T: DeserializeOwned>(
    source: &dyn AssetSource,
    url: &str,
) -> Result<T, FetchError> {
    let text = source.fetch_text(url).await?;
    serde_json::from_str(&text).map_err(|e| FetchError::Catalogue {
        url: url.to_string(),
        message: e.to_string(),
    })
}

//! On-disk scenario cache.
//!
//! Scenario assets never change once published, so a cached file is used
//! as-is forever. Layout: `{root}/{asset_bundle_name}/{scenario_id}.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bestdori_epub_core::{Scenario, ScenarioAsset};
use tracing::{debug, info};

use super::{AssetSource, Endpoints};
use crate::error::{ChapterError, FetchError};

/// Scenario cache in front of an [`AssetSource`].
#[derive(Clone)]
pub struct AssetCache {
    root: PathBuf,
    source: Arc<dyn AssetSource>,
    endpoints: Endpoints,
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("root", &self.root)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl AssetCache {
    /// Creates a cache rooted at `root`, filling misses from `source`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, source: Arc<dyn AssetSource>, endpoints: Endpoints) -> Self {
        Self {
            root: root.into(),
            source,
            endpoints,
        }
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the scenario for `scenario_id` in `bundle` is cached.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidCacheKey` if either name could escape
    /// the cache directory.
    pub fn path_for(&self, bundle: &str, scenario_id: &str) -> Result<PathBuf, FetchError> {
        check_key(bundle)?;
        check_key(scenario_id)?;
        Ok(self.root.join(bundle).join(format!("{scenario_id}.json")))
    }

    /// Loads one chapter's scenario, downloading it on a cache miss.
    ///
    /// A downloaded asset is parsed before it is written, so the cache
    /// only ever holds usable files.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::Fetch` if the download or cache I/O fails and
    /// `ChapterError::Malformed` if the asset does not parse.
    pub async fn load_scenario(
        &self,
        bundle: &str,
        event_id: u32,
        scenario_id: &str,
    ) -> Result<Scenario, ChapterError> {
        let path = self.path_for(bundle, scenario_id)?;

        if tokio::fs::try_exists(&path).await.map_err(FetchError::from)? {
            debug!(path = %path.display(), "cache hit");
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(FetchError::from)?;
            return Ok(ScenarioAsset::from_json(&text)?.base);
        }

        let url = self.endpoints.scenario(event_id, scenario_id);
        info!(event_id, scenario_id, "downloading scenario");
        let text = self.source.fetch_text(&url).await?;
        let asset = ScenarioAsset::from_json(&text)?;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(FetchError::from)?;
        }
        // write then rename so an interrupted run never leaves a truncated hit
        let partial = path.with_extension("json.part");
        tokio::fs::write(&partial, &text)
            .await
            .map_err(FetchError::from)?;
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(FetchError::from)?;
        debug!(path = %path.display(), "cached");

        Ok(asset.base)
    }
}

/// Rejects names that are empty, contain a path separator, or are a
/// relative directory reference.
fn check_key(name: &str) -> Result<(), FetchError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FetchError::InvalidCacheKey(name.to_string()));
    }
    Ok(())
}

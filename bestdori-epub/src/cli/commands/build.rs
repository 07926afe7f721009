//! `build` command handler
//!
//! Fetches the catalogue, runs the pipeline, and reports what happened.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::args::{BuildArgs, OutputFormat};
use crate::config::settings_for_build;
use crate::convert::converter_for;
use crate::error::AppError;
use crate::fetch::{AssetCache, AssetSource, Catalogue, Endpoints, HttpSource};
use crate::pipeline::{BuildContext, BuildSummary, Pipeline};

/// Build books for every started event.
///
/// # Errors
///
/// Returns a configuration or fetch error if the run cannot start, and
/// `AppError::StoriesFailed` if it finished with failed stories, or
/// `AppError::Interrupted` if `cancel` fired first.
pub async fn run(
    args: &BuildArgs,
    config: Option<&Path>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    let settings = settings_for_build(config, args)?;
    let now = args.source.now.unwrap_or_else(Utc::now);

    let source: Arc<dyn AssetSource> = Arc::new(HttpSource::new(settings.timeout()?)?);
    let endpoints = Endpoints::new(settings.base_url(), settings.region);

    info!(region = %settings.region, now = %now, "fetching catalogue");
    let catalogue = Catalogue::fetch(source.as_ref(), &endpoints).await?;
    info!(events = catalogue.events.len(), "catalogue loaded");

    let cache = AssetCache::new(settings.cache_dir.clone(), source, endpoints);
    let converter = converter_for(&settings)?;
    let ctx = BuildContext::from_settings(&settings, now).with_only_events(args.events.iter().copied());

    let summary = Pipeline::new(ctx, cache, converter).run(&catalogue, cancel).await?;
    write_summary(&mut std::io::stdout().lock(), &summary, args.summary, quiet)?;

    if summary.interrupted {
        Err(AppError::Interrupted)
    } else if summary.failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::StoriesFailed {
            failed: summary.failed.len(),
            attempted: summary.attempted(),
        })
    }
}

/// Writes the run summary. With `quiet`, the human form keeps only the
/// failures; JSON was asked for explicitly and is always written.
fn write_summary(
    out: &mut impl Write,
    summary: &BuildSummary,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Human => {
            if !quiet {
                for path in &summary.converted {
                    writeln!(out, "wrote    {}", path.display())?;
                }
                for skipped in &summary.skipped {
                    writeln!(out, "skipped  event {} ({:?})", skipped.event_id, skipped.reason)?;
                }
            }
            for failed in &summary.failed {
                writeln!(out, "failed   event {}: {}", failed.event_id, failed.error)?;
            }
            if !quiet {
                writeln!(
                    out,
                    "{} written, {} skipped, {} failed",
                    summary.converted.len(),
                    summary.skipped.len(),
                    summary.failed.len()
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

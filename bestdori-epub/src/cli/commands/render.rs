//! `render` command handler
//!
//! Renders one scenario asset file to stdout. Handy for checking a cached
//! chapter without fetching anything.

use std::path::Path;

use bestdori_epub_core::ScenarioAsset;
use bestdori_epub_markdown::{Renderer, SeparatorPolicy};

use crate::cli::args::RenderArgs;
use crate::config::load_settings;
use crate::error::AppError;

/// Render a scenario asset file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read and a render error if
/// it is not a well-formed scenario.
pub fn run(args: &RenderArgs, config: Option<&Path>) -> Result<(), AppError> {
    let settings = load_settings(config)?;
    let policy = if args.legacy_separators || settings.legacy_separators {
        SeparatorPolicy::Legacy
    } else {
        SeparatorPolicy::Deduplicate
    };

    let text = std::fs::read_to_string(&args.file)?;
    let asset = ScenarioAsset::from_json(&text)?;
    let markdown = Renderer::new()
        .with_separator_policy(policy)
        .render(&asset.base)?;

    print!("{markdown}");
    Ok(())
}

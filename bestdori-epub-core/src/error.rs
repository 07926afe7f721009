//! Core error types for `bestdori-epub`.
//!
//! Rendering errors shared by the markdown crate and the CLI.

use thiserror::Error;

// ============================================================================
// Rendering Errors
// ============================================================================

/// Errors raised while turning a scenario into prose.
///
/// Unrecognized action and effect kinds are not errors; they render to
/// nothing. Only data that cannot be trusted ends up here.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The scenario refers to data it does not contain, or could not be
    /// parsed at all.
    #[error("malformed scenario{}: {reason}", snippet.map_or_else(String::new, |i| format!(" at snippet {i}")))]
    MalformedScenario {
        /// Position of the offending snippet, if the failure is tied to one.
        snippet: Option<usize>,
        /// What is wrong with it.
        reason: String,
    },
}

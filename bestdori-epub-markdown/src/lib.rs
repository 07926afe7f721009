//! `bestdori-epub` Markdown - scenario prose rendering
//!
//! Turns scenario scripts into markdown fragments and assembles them into
//! one pandoc-ready document per event story. Everything here is pure and
//! synchronous; fetching and conversion live in the `bestdori-epub` crate.

pub mod document;
pub mod escape;
pub mod filename;
pub mod render;

pub use document::StoryDocument;
pub use escape::escape_markdown;
pub use filename::{sanitize_file_name, story_file_stem};
pub use render::{Renderer, SeparatorPolicy, render};

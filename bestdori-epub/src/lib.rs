//! `bestdori-epub` - Bang Dream! event stories as e-books
//!
//! Fetches event catalogues and scenario assets from the Bestdori mirror,
//! caches them on disk, renders each chapter to markdown, and converts
//! every story to an EPUB with pandoc.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod observability;
pub mod pipeline;

//! Book conversion.
//!
//! A [`Converter`] turns one assembled markdown document into an artifact
//! on disk. [`PandocConverter`] pipes the markdown through pandoc;
//! [`MarkdownWriter`] writes it out unchanged.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::schema::{BookFormat, Settings};
use crate::error::{ConfigError, ConvertError};

/// Longest a single pandoc run may take.
pub const CONVERT_TIMEOUT: Duration = Duration::from_secs(300);

/// Writes a finished story document to its destination.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Extension of the files this converter writes.
    fn extension(&self) -> &'static str;

    /// Writes `markdown` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns a `ConvertError` if the artifact could not be produced.
    async fn convert(&self, markdown: &str, destination: &Path) -> Result<(), ConvertError>;
}

/// Builds the converter for the configured format.
///
/// # Errors
///
/// Returns a `ConfigError` if the pandoc arguments do not parse.
pub fn converter_for(settings: &Settings) -> Result<Box<dyn Converter>, ConfigError> {
    Ok(match settings.format {
        BookFormat::Epub => Box::new(PandocConverter::new(
            settings.pandoc.clone(),
            settings.pandoc_args()?,
        )),
        BookFormat::Markdown => Box::new(MarkdownWriter),
    })
}

// ============================================================================
// Pandoc
// ============================================================================

/// Converts markdown to EPUB with pandoc.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
    extra_args: Vec<String>,
    timeout: Duration,
}

impl PandocConverter {
    /// Uses `program` as pandoc, appending `extra_args` to every run.
    #[must_use]
    pub const fn new(program: String, extra_args: Vec<String>) -> Self {
        Self {
            program,
            extra_args,
            timeout: CONVERT_TIMEOUT,
        }
    }

    /// Overrides the per-run timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full argument list for writing to `destination`.
    #[must_use]
    pub fn args(&self, destination: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            "markdown".to_string(),
            "-t".to_string(),
            "epub".to_string(),
            "-o".to_string(),
            destination.display().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Converter for PandocConverter {
    fn extension(&self) -> &'static str {
        BookFormat::Epub.extension()
    }

    async fn convert(&self, markdown: &str, destination: &Path) -> Result<(), ConvertError> {
        let args = self.args(destination);
        debug!(program = %self.program, args = ?args, "running converter");

        let mut child = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ConvertError::SpawnFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        // stdin is closed when the handle drops at the end of the arm
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(markdown.as_bytes()).await,
            None => Ok(()),
        };
        // A converter that rejects its arguments exits without reading
        // stdin; its exit status decides which error is reported.
        let broken_pipe = match written {
            Ok(()) => None,
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!(program = %self.program, "converter closed stdin early");
                Some(e)
            }
            Err(e) => return Err(e.into()),
        };

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ConvertError::Timeout(self.timeout))??;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(ConvertError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        // exited cleanly without reading the whole document
        if let Some(e) = broken_pipe {
            return Err(e.into());
        }

        // pandoc warns on stderr (missing title, unknown metadata) and still succeeds
        if !stderr.is_empty() {
            warn!(destination = %destination.display(), stderr = %stderr, "converter warnings");
        }

        Ok(())
    }
}

// ============================================================================
// Plain markdown
// ============================================================================

/// Writes the markdown document as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

#[async_trait]
impl Converter for MarkdownWriter {
    fn extension(&self) -> &'static str {
        BookFormat::Markdown.extension()
    }

    async fn convert(&self, markdown: &str, destination: &Path) -> Result<(), ConvertError> {
        tokio::fs::write(destination, markdown).await?;
        Ok(())
    }
}

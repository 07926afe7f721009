//! Error types for `bestdori-epub`
//!
//! One enum per concern (configuration, fetching, conversion), aggregated
//! by [`AppError`], which also maps every failure to a process exit code.

use std::path::PathBuf;

use bestdori_epub_core::RenderError;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `bestdori-epub` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error, including a build where some stories failed
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, bad value)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Mirror unreachable or returned something unusable
    pub const FETCH_ERROR: i32 = 4;

    /// Scenario data could not be rendered
    pub const RENDER_ERROR: i32 = 5;

    /// External converter failed
    pub const CONVERT_ERROR: i32 = 6;

    /// Usage error (invalid arguments)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `bestdori-epub` operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fetching from the mirror or the cache failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A scenario could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The external converter failed
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// One chapter of a story could not be loaded or rendered
    #[error("event {event_id}, chapter {scenario_id}: {source}")]
    Chapter {
        /// Event the chapter belongs to
        event_id: u32,
        /// Scenario id of the chapter
        scenario_id: String,
        /// What went wrong
        #[source]
        source: ChapterError,
    },

    /// A build finished but some stories were skipped because of errors
    #[error("{failed} of {attempted} stories failed")]
    StoriesFailed {
        /// Stories that failed to build or convert
        failed: usize,
        /// Stories attempted
        attempted: usize,
    },

    /// The run was stopped by a signal
    #[error("interrupted")]
    Interrupted,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Fetch(_) => ExitCode::FETCH_ERROR,
            Self::Render(_) => ExitCode::RENDER_ERROR,
            Self::Chapter { source, .. } => match source {
                ChapterError::Fetch(_) => ExitCode::FETCH_ERROR,
                ChapterError::Malformed(_) => ExitCode::RENDER_ERROR,
            },
            Self::Convert(_) => ExitCode::CONVERT_ERROR,
            Self::StoriesFailed { .. } | Self::Json(_) => ExitCode::ERROR,
            Self::Interrupted => ExitCode::INTERRUPTED,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Settings file and option errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the settings file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Settings file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Fetch Errors
// ============================================================================

/// Errors from the mirror client and the asset cache.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// Connection or transfer failure
    #[error("request to {url} failed: {message}")]
    Network {
        /// Requested URL
        url: String,
        /// Underlying error
        message: String,
    },

    /// Non-2xx response
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// Request exceeded the configured timeout
    #[error("request to {url} timed out")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// A catalogue document did not have the expected shape
    #[error("unexpected catalogue data from {url}: {message}")]
    Catalogue {
        /// Requested URL
        url: String,
        /// Parser message
        message: String,
    },

    /// A name from the catalogue cannot be used as a cache path component
    #[error("refusing to cache under '{0}'")]
    InvalidCacheKey(String),

    /// Cache read or write failed
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single chapter could not be produced.
#[derive(Debug, Error)]
pub enum ChapterError {
    /// The chapter's scenario could not be fetched or cached
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The chapter's scenario is malformed
    #[error(transparent)]
    Malformed(#[from] RenderError),
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors from writing the final e-book artifact.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter process could not be started
    #[error("failed to start {program}: {message}")]
    SpawnFailed {
        /// Program that was spawned
        program: String,
        /// Underlying error
        message: String,
    },

    /// The converter exited unsuccessfully
    #[error("converter exited with {}: {stderr}", code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    NonZeroExit {
        /// Exit status, `None` if killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The converter did not finish in time
    #[error("converter timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Writing the output failed
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `bestdori-epub` operations.
pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// Tests
// ============================================================================

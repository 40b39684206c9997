//! Error types for `compdocs`
//!
//! Content and section failures are collapsed to `None` at the loader and
//! registry boundaries; these types carry the detail into the diagnostic
//! log before that happens. Only the CLI surfaces `CompdocsError`.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `compdocs` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// I/O error (content root missing, unreadable file)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (unknown flag, bad value, missing argument); the status
    /// clap uses for its own parse failures
    pub const USAGE_ERROR: i32 = 2;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `compdocs` commands.
#[derive(Debug, Error)]
pub enum CompdocsError {
    /// Content discovery or parsing error
    #[error(transparent)]
    Content(#[from] ContentError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompdocsError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Content(ContentError::Io { .. }) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Content(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Content Errors
// ============================================================================

/// Errors raised while discovering, reading, or parsing a content file.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML parse or schema error.
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON parse or schema error.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// MDX frontmatter block is malformed.
    #[error("malformed frontmatter in {path}: {message}")]
    Frontmatter {
        /// File that failed
        path: PathBuf,
        /// What was wrong
        message: String,
    },

    /// The file extension has no known data format.
    #[error("unsupported data format: {}", path.display())]
    UnsupportedFormat {
        /// File that was requested
        path: PathBuf,
    },

    /// The content root could not be scanned.
    #[error("invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

// ============================================================================
// Section Errors
// ============================================================================

/// Unexpected failure inside a section resolver.
///
/// Missing content is not an error; resolvers return `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum SectionError {
    /// Content loaded but did not have the shape the section needs.
    #[error("section {section}: unexpected content shape: {message}")]
    Schema {
        /// Section key
        section: String,
        /// Description of the mismatch
        message: String,
    },

    /// Content layer failure surfaced by a custom resolver.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Any other resolver failure.
    #[error("section {section} failed: {message}")]
    Failed {
        /// Section key
        section: String,
        /// Failure description
        message: String,
    },
}

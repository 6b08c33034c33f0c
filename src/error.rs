//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI uses `anyhow` for convenient error propagation.
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`RecognitionError`], [`CoverError`]) for detailed handling.
//!   Cover errors never reach [`Error`]: a missing cover only costs a warning.
//!
//! [`CoverError`]: crate::cover::CoverError
//!
//! ```ignore
//! use auto_tag::error::{Error, Result, ResultExt};
//!
//! fn move_track(src: &Path, dest: &Path) -> Result<()> {
//!     std::fs::rename(src, dest).with_context("moving track")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use crate::recognition::RecognitionError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Recognition failed or found nothing
    #[error("Recognition failed: {0}")]
    Recognition(#[from] RecognitionError),

    /// Tag reading/writing error
    #[error("Tag error for {path}: {message}")]
    Tagging { path: PathBuf, message: String },

    /// File organization error
    #[error("Organization error: {0}")]
    Organization(String),

    /// Review plan could not be read or written
    #[error("Plan error: {0}")]
    Plan(#[from] serde_json::Error),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a tagging error.
    pub fn tagging(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Tagging {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an organization error.
    pub fn organization(message: impl Into<String>) -> Self {
        Self::Organization(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

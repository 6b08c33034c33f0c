//! Internal domain models for track recognition.
//!
//! Backend responses (AcoustID JSON, Shazam JSON) are converted into these
//! types by each backend's adapter and never leak past it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a recognition backend found for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedTrack {
    /// Track title
    pub title: Option<String>,
    /// Artist name (Shazam calls this the subtitle)
    pub artist: Option<String>,
    /// Album title
    pub album: Option<String>,
    /// URL of the cover image, if the service knows one
    pub cover_url: Option<String>,
}

/// Audio fingerprint for a track
#[derive(Debug, Clone)]
pub struct AudioFingerprint {
    /// The fingerprint string (Chromaprint format)
    pub fingerprint: String,
    /// Duration of the audio in seconds (required by AcoustID)
    pub duration_secs: u32,
}

/// Which recognition service to ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Shazam, through the `songrec` command-line client
    #[default]
    Shazam,
    /// AcoustID, through Chromaprint's `fpcalc`
    Acoustid,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Shazam => f.write_str("shazam"),
            Backend::Acoustid => f.write_str("acoustid"),
        }
    }
}

/// Errors that can occur during recognition
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("Failed to generate fingerprint: {0}")]
    Fingerprint(String),

    #[error("{0} not found")]
    ToolMissing(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("API key rejected: {0}")]
    InvalidApiKey(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No match found")]
    NoMatch,

    #[error("Gave up after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

impl RecognitionError {
    /// Errors that asking again cannot fix
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            RecognitionError::ToolMissing(_) | RecognitionError::InvalidApiKey(_)
        )
    }
}

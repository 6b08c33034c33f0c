//! The recognizer seam.
//!
//! Production code picks a real backend at runtime; tests substitute the
//! mocks below.

use std::path::Path;

use async_trait::async_trait;

use super::domain::{RecognitionError, RecognizedTrack};

/// A service that can tell which song an audio file contains.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Recognize a single file.
    ///
    /// `Ok(None)` means the service answered but found no match.
    async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError>;
}

#[async_trait]
impl Recognizer for super::shazam::SongRecRecognizer {
    fn name(&self) -> &'static str {
        "shazam"
    }

    async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError> {
        self.recognize(path).await
    }
}

#[async_trait]
impl Recognizer for super::acoustid::AcoustIdRecognizer {
    fn name(&self) -> &'static str {
        "acoustid"
    }

    async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError> {
        self.recognize(path).await
    }
}

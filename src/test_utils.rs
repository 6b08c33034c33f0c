//! Test utilities and fixtures for auto-tag tests.
//!
//! Mock collaborators for the [`Tagger`](crate::tagger::Tagger) and a few
//! fixtures shared between modules. Mock recognizers live next to the trait
//! in `recognition::traits::mocks`.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{beatles_recognizer, dummy_audio_file};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let file = dummy_audio_file(dir.path(), "fileToTest.mp3");
//!     // ... test logic
//! }
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::cover::{CoverError, CoverFetcher, CoverImage};
use crate::error::{Error, Result};
use crate::metadata::TagWriter;
use crate::naming::TrackTags;
use crate::recognition::traits::mocks::FixedRecognizer;

/// Sanitized tags for the track every mock recognizes
pub fn beatles_tags() -> TrackTags {
    TrackTags {
        title: "Drive My Car".to_string(),
        artist: "The Beatles".to_string(),
        album: "Rubber Soul".to_string(),
    }
}

/// Recognizer that always answers "Drive My Car" by The Beatles, without cover art.
pub fn beatles_recognizer() -> FixedRecognizer {
    FixedRecognizer::new("Drive My Car", "The Beatles", "Rubber Soul")
}

/// Create a small non-audio file standing in for a track.
pub fn dummy_audio_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"dummy audio data").expect("Failed to write dummy audio file");
    path
}

/// Cover fetcher returning a canned JPEG, or always failing.
pub struct MockCoverFetcher {
    fail: bool,
    calls: AtomicU32,
}

impl MockCoverFetcher {
    pub fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoverFetcher for MockCoverFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<CoverImage, CoverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoverError::NotFound(url.to_string()));
        }
        Ok(CoverImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xE0],
            mime_type: "image/jpeg".to_string(),
            url: url.to_string(),
        })
    }
}

/// Tag writer that records what it was asked to write instead of touching files.
#[derive(Default)]
pub struct RecordingTagWriter {
    fail: bool,
    writes: Mutex<Vec<(PathBuf, TrackTags, Option<CoverImage>)>>,
}

impl RecordingTagWriter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _, _)| path.clone())
            .collect()
    }

    pub fn written_tags(&self) -> Vec<TrackTags> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(_, tags, _)| tags.clone())
            .collect()
    }

    pub fn covers_written(&self) -> usize {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, cover)| cover.is_some())
            .count()
    }
}

impl TagWriter for RecordingTagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags, cover: Option<&CoverImage>) -> Result<()> {
        if self.fail {
            return Err(Error::tagging(path, "mock write failure"));
        }
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), tags.clone(), cover.cloned()));
        Ok(())
    }
}

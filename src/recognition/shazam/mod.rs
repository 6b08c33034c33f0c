//! Shazam recognition through the SongRec command-line client.
//!
//! SongRec computes the Shazam signature locally and prints the raw Shazam
//! JSON response, so this backend needs no API key. Like fpcalc, it is run as
//! a subprocess on a blocking thread.

pub mod dto;

use std::path::{Path, PathBuf};
use std::process::Command;

use super::domain::{RecognitionError, RecognizedTrack};
use super::tools::{self, SONGREC};

/// Recognizer that shells out to `songrec audio-file-to-recognized-song`
pub struct SongRecRecognizer {
    songrec_path: Option<PathBuf>,
}

impl SongRecRecognizer {
    pub fn new(songrec_path: Option<PathBuf>) -> Self {
        Self { songrec_path }
    }

    pub async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError> {
        let owned = path.to_path_buf();
        let configured = self.songrec_path.clone();
        let stdout = tokio::task::spawn_blocking(move || run_songrec(&owned, configured.as_deref()))
            .await
            .map_err(|e| RecognitionError::Api(format!("songrec task failed: {}", e)))??;

        parse_response(&stdout)
    }
}

fn run_songrec(path: &Path, configured: Option<&Path>) -> Result<String, RecognitionError> {
    let songrec = tools::locate(&SONGREC, configured)
        .ok_or_else(|| RecognitionError::ToolMissing("songrec".to_string()))?;

    let output = Command::new(songrec)
        .arg("audio-file-to-recognized-song")
        .arg(path)
        .output()
        .map_err(|e| RecognitionError::Api(format!("Failed to run songrec: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RecognitionError::Api(format!(
            "songrec failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Convert a Shazam JSON response into a domain track.
///
/// A response without a `track` object is a valid "no match" answer.
pub fn parse_response(json: &str) -> Result<Option<RecognizedTrack>, RecognitionError> {
    let response: dto::RecognizeResponse =
        serde_json::from_str(json).map_err(|e| RecognitionError::Parse(e.to_string()))?;

    let Some(track) = response.track else {
        return Ok(None);
    };

    let album = track.album().map(String::from);

    let cover_url = track
        .images
        .and_then(|images| images.coverart)
        .filter(|url| !url.is_empty());

    Ok(Some(RecognizedTrack {
        title: track.title,
        artist: track.subtitle,
        album,
        cover_url,
    }))
}

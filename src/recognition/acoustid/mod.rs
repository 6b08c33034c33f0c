//! AcoustID recognition backend
//!
//! AcoustID is a free service that identifies music by audio fingerprint.
//! API docs: https://acoustid.org/webservice

mod adapter;
mod client;
pub mod dto;

use std::path::{Path, PathBuf};

use adapter::{best_candidate, to_candidates};
use client::AcoustIdClient;

use super::domain::{RecognitionError, RecognizedTrack};
use super::fingerprint;
use crate::cover::CoverSize;

/// Recognizer backed by fpcalc + the AcoustID lookup API
pub struct AcoustIdRecognizer {
    client: AcoustIdClient,
    fpcalc_path: Option<PathBuf>,
    min_confidence: f32,
    cover_size: CoverSize,
}

impl AcoustIdRecognizer {
    pub fn new(
        api_key: impl Into<String>,
        fpcalc_path: Option<PathBuf>,
        min_confidence: f32,
    ) -> Result<Self, RecognitionError> {
        Ok(Self {
            client: AcoustIdClient::new(api_key)?,
            fpcalc_path,
            min_confidence,
            cover_size: CoverSize::default(),
        })
    }

    /// Fingerprint the file, look it up, and keep the best candidate.
    pub async fn recognize(&self, path: &Path) -> Result<Option<RecognizedTrack>, RecognitionError> {
        let owned = path.to_path_buf();
        let fpcalc = self.fpcalc_path.clone();
        let fp = tokio::task::spawn_blocking(move || {
            fingerprint::generate_fingerprint(&owned, fpcalc.as_deref())
        })
        .await
        .map_err(|e| RecognitionError::Fingerprint(format!("fingerprint task failed: {}", e)))??;

        let response = self.client.lookup(&fp).await?;
        let candidates = to_candidates(response, self.cover_size)?;
        tracing::debug!("{} AcoustID candidate(s) for {:?}", candidates.len(), path);

        Ok(best_candidate(candidates, self.min_confidence).map(|c| c.track))
    }
}

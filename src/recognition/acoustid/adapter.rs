//! Adapter layer: Convert AcoustID DTOs to domain models
//!
//! This is the only place where AcoustID DTO types are converted to domain
//! types.

use super::dto;
use crate::cover::{self, CoverSize};
use crate::recognition::domain::{RecognitionError, RecognizedTrack};

/// AcoustID error code for a missing or unknown client key
const INVALID_API_KEY: i32 = 4;

/// One possible identification of a file, with AcoustID's confidence
#[derive(Debug, Clone)]
pub struct Candidate {
    pub score: f32,
    pub track: RecognizedTrack,
}

/// Convert an AcoustID lookup response to candidates
///
/// Each recording is expanded into one candidate per release group, so the
/// album can be chosen alongside the recording.
pub fn to_candidates(
    response: dto::LookupResponse,
    cover_size: CoverSize,
) -> Result<Vec<Candidate>, RecognitionError> {
    if response.status != "ok" {
        return Err(match response.error {
            Some(e) if e.code == INVALID_API_KEY => RecognitionError::InvalidApiKey(e.message),
            Some(e) => RecognitionError::Api(format!("{} (code {})", e.message, e.code)),
            None => RecognitionError::Api("Unknown error".to_string()),
        });
    }

    Ok(response
        .results
        .into_iter()
        .flat_map(|result| {
            let score = result.score;
            result
                .recordings
                .into_iter()
                .flat_map(move |recording| recording_candidates(recording, score, cover_size))
        })
        .collect())
}

/// Credit string built from all artists and their join phrases
fn artist_credit(artists: &[dto::Artist]) -> Option<String> {
    if artists.is_empty() {
        return None;
    }
    let mut credit = String::new();
    for (i, artist) in artists.iter().enumerate() {
        credit.push_str(&artist.name);
        if i + 1 < artists.len() {
            credit.push_str(artist.joinphrase.as_deref().unwrap_or(", "));
        }
    }
    Some(credit)
}

fn recording_candidates(
    recording: dto::Recording,
    score: f32,
    cover_size: CoverSize,
) -> Vec<Candidate> {
    let artist = artist_credit(&recording.artists);
    let title = recording.title;

    if recording.releasegroups.is_empty() {
        return vec![Candidate {
            score,
            track: RecognizedTrack {
                title,
                artist,
                album: None,
                cover_url: None,
            },
        }];
    }

    recording
        .releasegroups
        .into_iter()
        .map(|group| Candidate {
            score,
            track: RecognizedTrack {
                title: title.clone(),
                artist: artist.clone(),
                album: group.title,
                cover_url: Some(cover::release_group_front_url(&group.id, cover_size)),
            },
        })
        .collect()
}

/// Select the best candidate at or above `min_confidence`
///
/// Highest score wins; on equal scores a candidate with an album is preferred.
pub fn best_candidate(candidates: Vec<Candidate>, min_confidence: f32) -> Option<Candidate> {
    candidates
        .into_iter()
        .filter(|c| c.score >= min_confidence)
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.track.album.is_some().cmp(&b.track.album.is_some()))
        })
}

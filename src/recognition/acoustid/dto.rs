//! AcoustID API Data Transfer Objects
//!
//! These types match what the AcoustID lookup endpoint returns with
//! `meta=recordings+releasegroups+compress`. They stay inside the acoustid
//! module; the adapter converts them to domain types.
//!
//! API Reference: https://acoustid.org/webservice#lookup
//!
//! Example response:
//! ```json
//! {
//!   "status": "ok",
//!   "results": [{
//!     "id": "abcd1234",
//!     "score": 0.95,
//!     "recordings": [{
//!       "id": "recording-mbid",
//!       "title": "Song Title",
//!       "artists": [{"id": "artist-mbid", "name": "Artist Name"}],
//!       "releasegroups": [{"id": "rg-mbid", "title": "Album", "type": "Album"}]
//!     }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level AcoustID lookup response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<LookupResult>,
    /// Error info if status != "ok"
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// A single fingerprint match result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupResult {
    /// AcoustID identifier
    pub id: String,
    /// Match confidence (0.0 to 1.0)
    pub score: f32,
    /// Associated MusicBrainz recordings (if meta=recordings requested)
    #[serde(default)]
    pub recordings: Vec<Recording>,
}

/// MusicBrainz recording info returned by AcoustID
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Recording {
    /// MusicBrainz recording ID
    pub id: String,
    pub title: Option<String>,
    /// Duration in seconds (API returns float, e.g. 353.0)
    pub duration: Option<f64>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Release groups (album groupings) this recording appears on
    #[serde(default)]
    pub releasegroups: Vec<ReleaseGroup>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    /// MusicBrainz artist ID
    pub id: String,
    pub name: String,
    /// Join phrase to the next artist (" & ", " feat. ")
    pub joinphrase: Option<String>,
}

/// Release group info (when meta=releasegroups requested)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseGroup {
    /// MusicBrainz release group ID
    pub id: String,
    pub title: Option<String>,
    /// Primary type (Album, Single, EP, etc.)
    #[serde(rename = "type")]
    pub release_type: Option<String>,
    /// Secondary types (Compilation, Live, Soundtrack, etc.)
    #[serde(default)]
    pub secondarytypes: Vec<String>,
}

// ============================================================================
// CONTRACT TESTS
// If these fail, the API has changed and the DTOs need updating.
// ============================================================================

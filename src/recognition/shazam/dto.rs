//! Shazam response shapes, as printed by `songrec audio-file-to-recognized-song`.
//!
//! Only the fields we read are modeled. The album sits somewhere in loosely
//! structured metadata (usually `sections[].metadata[]`), so the rest of the
//! track is kept as raw JSON, in document order, and searched with
//! [`find_metadata_text`].

use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level recognition response
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizeResponse {
    /// Present only when Shazam found a match
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub title: Option<String>,
    /// Artist name
    pub subtitle: Option<String>,
    pub images: Option<Images>,
    /// Every other field of the track
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Track {
    /// First `Album` metadata entry anywhere in the track.
    pub fn album(&self) -> Option<&str> {
        self.rest
            .values()
            .find_map(|value| find_metadata_text(value, "Album"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Images {
    pub coverart: Option<String>,
}

/// Depth-first search for an object whose `title` equals `key` and which has
/// a `text` field; returns that text.
pub fn find_metadata_text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    match value {
        Value::Object(map) => {
            if map.get("title").and_then(Value::as_str) == Some(key)
                && let Some(text) = map.get("text")
            {
                return text.as_str();
            }
            map.values().find_map(|v| find_metadata_text(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_metadata_text(v, key)),
        _ => None,
    }
}

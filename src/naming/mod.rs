//! Filesystem-safe names from recognition results.
//!
//! Titles, artists and albums come back from the recognition service in any
//! script and with decorations like "(Remastered 2009)". They are
//! transliterated, stripped and title-cased before being used as tags and
//! path components.

use any_ascii::any_ascii;
use serde::{Deserialize, Serialize};

use crate::recognition::RecognizedTrack;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Returned when nothing usable survives sanitization
pub const EMPTY_FALLBACK: &str = "Unknown song";

/// Characters Windows refuses in file names
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitized tag values for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl TrackTags {
    /// Fill in defaults for missing fields and sanitize everything.
    pub fn from_recognized(track: &RecognizedTrack) -> Self {
        Self {
            title: sanitize(track.title.as_deref().unwrap_or(UNKNOWN_TITLE)),
            artist: sanitize(track.artist.as_deref().unwrap_or(UNKNOWN_ARTIST)),
            album: sanitize(track.album.as_deref().unwrap_or(UNKNOWN_ALBUM)),
        }
    }
}

/// Remove parenthesized content, honoring nesting. A `)` without an opener is kept.
fn strip_parenthesized(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut depth = 0usize;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// First character upper case, the rest lower case.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Turn a raw title/artist/album into a safe, tidy name component.
///
/// Transliterates to ASCII and drops parenthesized parts; if that leaves
/// nothing, the original text is used instead. Invalid filename characters
/// are removed, `&` becomes `-`, and each word is capitalized. A result made
/// only of dots is treated as empty.
pub fn sanitize(raw: &str) -> String {
    let mut name = strip_parenthesized(&any_ascii(raw));
    if name.trim().is_empty() {
        name = raw.to_string();
    }

    let name: String = name
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .map(|c| if c == '&' { '-' } else { c })
        .collect();

    let name = name
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    // "." and ".." would name the current or parent directory
    if name.chars().all(|c| c == '.') {
        tracing::warn!("Name {:?} became empty after sanitization", raw);
        return EMPTY_FALLBACK.to_string();
    }
    name
}

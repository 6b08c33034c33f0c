//! Review plan: what a run recognized and where each file goes.
//!
//! `recognize --dry-run --plan plan.json` writes one; the user may edit tags,
//! rename the destination file or untick `apply`, then `apply plan.json`
//! executes it. Edited text is sanitized again before it is used.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};
use crate::naming::{TrackTags, sanitize};
use crate::organizer::Layout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub source: PathBuf,
    /// Planned or actual destination; `None` when recognition failed
    pub destination: Option<PathBuf>,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Whether `apply` should act on this entry
    pub apply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanEntry {
    pub fn recognized(
        source: PathBuf,
        destination: PathBuf,
        tags: TrackTags,
        cover_url: Option<String>,
    ) -> Self {
        Self {
            source,
            destination: Some(destination),
            title: tags.title,
            artist: tags.artist,
            album: tags.album,
            cover_url,
            apply: true,
            error: None,
        }
    }

    /// Entry for a file that could not be processed
    pub fn failed(source: PathBuf, error: impl Into<String>) -> Self {
        Self {
            source,
            destination: None,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            cover_url: None,
            apply: false,
            error: Some(error.into()),
        }
    }

    /// Re-sanitize title, artist and album, which may have been hand-edited.
    pub fn sanitize_tags(&mut self) {
        for field in [&mut self.title, &mut self.artist, &mut self.album] {
            *field = sanitize(field.as_str());
        }
    }

    pub fn tags(&self) -> TrackTags {
        TrackTags {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// RFC 3339 creation time
    pub created_at: String,
    pub layout: Layout,
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn new(layout: Layout, entries: Vec<PlanEntry>) -> Self {
        Self {
            created_at: Utc::now().to_rfc3339(),
            layout,
            entries,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(format!("Failed to write plan {:?}", path))?;
        tracing::info!("Saved plan with {} entries to {:?}", self.entries.len(), path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(format!("Failed to read plan {:?}", path))?;
        Ok(serde_json::from_str(&json)?)
    }
}

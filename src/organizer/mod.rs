//! Destination planning and file movement.
//!
//! Recognized files are renamed either in place (flat layout,
//! `Title - Artist - Album.ext`) or into a Plex-style tree
//! (`Artist/Album/Title.ext`), optionally under another base directory, and
//! either moved or copied there.
//!
//! # Features
//! - Destination preview without touching the filesystem
//! - Collision avoidance with ` (1)`, ` (2)`, ... suffixes
//! - Cross-device moves (rename falls back to copy + delete)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResultExt};
use crate::naming::{TrackTags, sanitize};

/// How renamed files are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `Title - Artist - Album.ext` in the base directory
    #[default]
    Flat,
    /// `Artist/Album/Title.ext` under the base directory
    Plex,
}

/// Where a recognized file should end up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub layout: Layout,
    /// Base directory for moved files (default: the source's directory)
    pub output_dir: Option<PathBuf>,
    /// Copy instead of moving, into this base directory
    pub copy_to: Option<PathBuf>,
}

/// Whether the source survives the transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Move,
    Copy,
}

impl TransferMode {
    pub fn for_placement(placement: &Placement) -> Self {
        if placement.copy_to.is_some() {
            TransferMode::Copy
        } else {
            TransferMode::Move
        }
    }
}

/// Lowercased extension of `path` including the dot, or empty
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Compute the destination for `source` without checking for collisions.
pub fn planned_destination(source: &Path, tags: &TrackTags, placement: &Placement) -> PathBuf {
    let ext = dotted_extension(source);

    let base = placement
        .copy_to
        .as_deref()
        .or(placement.output_dir.as_deref())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source.parent().map(Path::to_path_buf).unwrap_or_default());

    match placement.layout {
        Layout::Flat => base.join(format!(
            "{} - {} - {}{}",
            tags.title, tags.artist, tags.album, ext
        )),
        Layout::Plex => base
            .join(&tags.artist)
            .join(&tags.album)
            .join(format!("{}{}", tags.title, ext)),
    }
}

/// Put the file name of a hand-edited `edited` path into `planned`'s directory.
///
/// The stem is sanitized like a tag and the source's extension is kept, so an
/// edit can change neither the directory nor the format suffix.
pub fn edited_destination(planned: &Path, edited: &Path, source: &Path) -> PathBuf {
    let stem = edited
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    planned.with_file_name(format!("{}{}", sanitize(&stem), dotted_extension(source)))
}

/// Make `candidate` unique on disk by appending ` (n)` to its stem.
///
/// A candidate equal to `source` is returned unchanged, so an already
/// correctly named file keeps its name.
pub fn unique_destination(candidate: &Path, source: &Path) -> PathBuf {
    if candidate == source || !candidate.exists() {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dir = candidate.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u32;
    loop {
        let next = dir.join(format!("{} ({}){}", stem, counter, ext));
        if next == source || !next.exists() {
            tracing::debug!("{:?} exists, using {:?}", candidate, next);
            return next;
        }
        counter += 1;
    }
}

/// Move or copy `source` to `dest`, creating parent directories.
pub fn transfer(source: &Path, dest: &Path, mode: TransferMode) -> Result<()> {
    if !source.exists() {
        return Err(Error::not_found(source));
    }
    if source == dest {
        return Ok(());
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(format!("Failed to create directory {:?}", parent))?;
    }

    match mode {
        TransferMode::Copy => {
            fs::copy(source, dest).with_context(format!("Failed to copy to {:?}", dest))?;
        }
        TransferMode::Move => {
            if let Err(e) = fs::rename(source, dest) {
                // Cross-device: copy + delete
                tracing::debug!("rename {:?} failed ({}), copying instead", source, e);
                fs::copy(source, dest).with_context(format!("Failed to copy to {:?}", dest))?;
                fs::remove_file(source)
                    .with_context(format!("Failed to remove source file {:?}", source))?;
            }
        }
    }
    Ok(())
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::naming::sanitize;
    use proptest::prelude::*;
    use std::path::Component;

    fn raw_text() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![".", "..", "...", "../..", "/", "a/../b", ". ."])
                .prop_map(|s| s.to_string()),
            "\\PC{0,20}",
            "[./\\\\a ]{0,8}",
        ]
    }

    fn component() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,20}".prop_map(|s| sanitize(&s))
    }

    proptest! {
        /// Planned destinations stay under the chosen base directory
        #[test]
        fn destination_stays_under_base(
            title in component(),
            artist in component(),
            album in component(),
            plex in any::<bool>(),
        ) {
            let tags = TrackTags { title, artist, album };
            let placement = Placement {
                layout: if plex { Layout::Plex } else { Layout::Flat },
                output_dir: Some(PathBuf::from("/music/library")),
                copy_to: None,
            };
            let dest = planned_destination(Path::new("/src/a.mp3"), &tags, &placement);
            prop_assert!(dest.starts_with("/music/library"));
        }

        /// The lowercased source extension is preserved
        #[test]
        fn destination_preserves_extension(
            ext in prop::sample::select(vec!["mp3", "OGG", "Flac"]),
            title in component(),
        ) {
            let tags = TrackTags {
                title,
                artist: "Artist".to_string(),
                album: "Album".to_string(),
            };
            let source = PathBuf::from(format!("/src/test.{}", ext));
            let dest = planned_destination(&source, &tags, &Placement::default());
            let lowered = ext.to_lowercase();
            prop_assert_eq!(dest.extension().and_then(|e| e.to_str()), Some(lowered.as_str()));
        }

        /// Arbitrary text, dots and separators included, never leaves the base
        #[test]
        fn destination_never_climbs_out(
            title in raw_text(),
            artist in raw_text(),
            album in raw_text(),
            plex in any::<bool>(),
        ) {
            let tags = TrackTags {
                title: sanitize(&title),
                artist: sanitize(&artist),
                album: sanitize(&album),
            };
            let placement = Placement {
                layout: if plex { Layout::Plex } else { Layout::Flat },
                output_dir: Some(PathBuf::from("/music/library")),
                copy_to: None,
            };
            let dest = planned_destination(Path::new("/src/a.mp3"), &tags, &placement);
            prop_assert!(dest.starts_with("/music/library"));
            prop_assert!(!dest.components().any(|c| matches!(c, Component::ParentDir | Component::CurDir)));
            let depth = if plex { 3 } else { 1 };
            prop_assert_eq!(dest.components().count(), Path::new("/music/library").components().count() + depth);
        }
    }
}

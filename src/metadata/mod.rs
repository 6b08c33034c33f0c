//! Audio file tag reading and writing.
//!
//! Uses the lofty crate for format-independent metadata access, so MP3
//! (ID3v2) and OGG Vorbis go through the same code path.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use std::path::Path;

use crate::cover::CoverImage;
use crate::error::{Error, Result};
use crate::naming::{TrackTags, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE};

/// Writes tags (and optionally a front cover) into an audio file.
pub trait TagWriter: Send + Sync {
    fn write_tags(&self, path: &Path, tags: &TrackTags, cover: Option<&CoverImage>) -> Result<()>;
}

/// [`TagWriter`] backed by lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagWriter;

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags, cover: Option<&CoverImage>) -> Result<()> {
        write(path, tags, cover)
    }
}

/// Read title/artist/album, with the usual "Unknown" defaults.
pub fn read_tags(path: &Path) -> Result<TrackTags> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::tagging(path, format!("Failed to open file for probing: {}", e)))?
        .read()
        .map_err(|e| Error::tagging(path, format!("Failed to read file metadata: {}", e)))?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let field = |value: Option<String>, default: &str| value.unwrap_or_else(|| default.to_string());

    Ok(TrackTags {
        title: field(tag.and_then(|t| t.title().map(|s| s.to_string())), UNKNOWN_TITLE),
        artist: field(tag.and_then(|t| t.artist().map(|s| s.to_string())), UNKNOWN_ARTIST),
        album: field(tag.and_then(|t| t.album().map(|s| s.to_string())), UNKNOWN_ALBUM),
    })
}

/// Write title/artist/album and replace the front cover.
pub fn write(path: &Path, tags: &TrackTags, cover: Option<&CoverImage>) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .map_err(|e| Error::tagging(path, format!("Failed to open file for writing: {}", e)))?
        .read()
        .map_err(|e| Error::tagging(path, format!("Failed to read file for tag writing: {}", e)))?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let Some(tag) = tagged_file.tag_mut(tag_type) else {
        return Err(Error::tagging(path, format!("No {:?} tag available", tag_type)));
    };

    tag.set_title(tags.title.clone());
    tag.set_artist(tags.artist.clone());
    tag.set_album(tags.album.clone());

    if let Some(cover) = cover {
        let mut picture = Picture::from_reader(&mut cover.data.as_slice()).map_err(|e| {
            Error::tagging(path, format!("Unusable cover image from {}: {}", cover.url, e))
        })?;
        picture.set_pic_type(PictureType::CoverFront);
        picture.set_description(Some("cover".to_string()));

        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(picture);
        tracing::debug!("Embedding {} cover ({} bytes)", cover.mime_type, cover.data.len());
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::tagging(path, format!("Failed to write tags to file: {}", e)))?;

    tracing::debug!("Wrote tags to {:?}", path);
    Ok(())
}

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// Parse a comma-separated extension list ("mp3, .OGG") into lowercase, dot-less entries.
pub fn normalize_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_excluded_dir(entry: &DirEntry, exclude_keywords: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy().to_lowercase();
    exclude_keywords
        .iter()
        .any(|k| !k.is_empty() && name.contains(&k.to_lowercase()))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// Recursively collect files under `root` whose extension is in `extensions`.
///
/// Subdirectories whose lowercased name contains one of `exclude_keywords`
/// are pruned: the walk does not descend into them, so nothing below them is
/// returned, however deep and whatever its own name. This is stricter than
/// skipping only the files directly inside a matching directory. The root is
/// never excluded, even if its own name matches.
///
/// Results are in a stable, name-sorted order. A `root` that is a single
/// matching file is returned on its own.
pub fn discover_audio_files(
    root: &Path,
    extensions: &[String],
    exclude_keywords: &[String],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(if has_extension(root, extensions) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, exclude_keywords));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!("Found {} file(s) under {:?}", files.len(), root);
    Ok(files)
}

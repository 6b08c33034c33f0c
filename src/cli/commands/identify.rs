//! Single-file recognition command.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::metadata;
use crate::naming::TrackTags;
use crate::organizer;
use crate::recognition::{self, Backend, RecognitionError, recognize_with_retry};

use super::resolve_api_key;

/// Recognize a single file and print what `recognize` would do with it
pub fn cmd_identify(
    rt: &Runtime,
    config: &Config,
    path: &Path,
    backend: Option<Backend>,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("Not a file: {:?}", path);
    }

    let backend = backend.unwrap_or(config.recognition.backend);
    let recognizer = recognition::build(backend, &config.recognition, resolve_api_key(api_key, config))?;

    println!("Identifying: {:?} ({})", path, backend);
    println!();

    if let Ok(current) = metadata::read_tags(path) {
        println!("Current tags:");
        println!("  Title:  {}", current.title);
        println!("  Artist: {}", current.artist);
        println!("  Album:  {}", current.album);
        println!();
    }

    let result = rt.block_on(recognize_with_retry(
        recognizer.as_ref(),
        path,
        config.recognition.retry_policy(),
    ));

    match result {
        Ok(track) => {
            let tags = TrackTags::from_recognized(&track);
            println!("✓ Match found!");
            println!();
            println!("  Title:  {}", tags.title);
            println!("  Artist: {}", tags.artist);
            println!("  Album:  {}", tags.album);
            if let Some(cover) = &track.cover_url {
                println!("  Cover:  {}", cover);
            }

            let dest = organizer::planned_destination(path, &tags, &config.output.placement());
            println!();
            println!("  Would become: {:?}", dest);
        }
        Err(RecognitionError::NoMatch) => {
            println!("✗ No matches found for this track.");
            println!("  The audio may not be known to {}.", backend);
        }
        Err(RecognitionError::ToolMissing(_)) => {
            let spec = match backend {
                Backend::Shazam => &recognition::tools::SONGREC,
                Backend::Acoustid => &recognition::tools::FPCALC,
            };
            recognition::tools::print_install_instructions(spec);
            anyhow::bail!("{} is required for the {} backend", spec.name, backend);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

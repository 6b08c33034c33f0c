//! Audio fingerprint generation using Chromaprint/fpcalc
//!
//! This module shells out to the `fpcalc` command-line tool (part of Chromaprint)
//! to generate audio fingerprints. It works on all platforms where fpcalc is
//! installed, see [`super::tools::FPCALC_PATHS`].

use std::path::Path;
use std::process::Command;

use super::domain::{AudioFingerprint, RecognitionError};
use super::tools::{self, FPCALC};

/// Generate an audio fingerprint for the given file
pub fn generate_fingerprint(
    path: &Path,
    fpcalc_path: Option<&Path>,
) -> Result<AudioFingerprint, RecognitionError> {
    let fpcalc = tools::locate(&FPCALC, fpcalc_path)
        .ok_or_else(|| RecognitionError::ToolMissing("fpcalc".to_string()))?;

    let output = Command::new(fpcalc)
        .arg("-json")
        .arg(path)
        .output()
        .map_err(|e| RecognitionError::Fingerprint(format!("Failed to run fpcalc: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RecognitionError::Fingerprint(format!(
            "fpcalc failed: {}",
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_fpcalc_json(&stdout)
}

/// Parse the JSON output from fpcalc
fn parse_fpcalc_json(json: &str) -> Result<AudioFingerprint, RecognitionError> {
    let parsed: FpcalcOutput = serde_json::from_str(json).map_err(|e| {
        RecognitionError::Fingerprint(format!("Failed to parse fpcalc output: {}", e))
    })?;

    if parsed.fingerprint.is_empty() {
        return Err(RecognitionError::Fingerprint(
            "fpcalc returned an empty fingerprint".to_string(),
        ));
    }

    Ok(AudioFingerprint {
        fingerprint: parsed.fingerprint,
        duration_secs: parsed.duration.round() as u32,
    })
}

/// fpcalc JSON output structure
#[derive(serde::Deserialize)]
struct FpcalcOutput {
    fingerprint: String,
    duration: f64,
}

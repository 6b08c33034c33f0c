//! Locating the external command-line tools the backends shell out to.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Common installation paths for fpcalc
#[cfg(windows)]
pub const FPCALC_PATHS: &[&str] = &[
    "fpcalc", // In PATH
    r"C:\Program Files\Chromaprint\fpcalc.exe",
    r"C:\Program Files\MusicBrainz Picard\fpcalc.exe",
    r"C:\Program Files (x86)\Chromaprint\fpcalc.exe",
    r"C:\Program Files (x86)\MusicBrainz Picard\fpcalc.exe",
];

#[cfg(not(windows))]
pub const FPCALC_PATHS: &[&str] = &[
    "fpcalc", // In PATH
    "/usr/bin/fpcalc",
    "/usr/local/bin/fpcalc",
    "/opt/homebrew/bin/fpcalc",
];

/// Common installation paths for songrec
#[cfg(windows)]
pub const SONGREC_PATHS: &[&str] = &["songrec", r"C:\Program Files\SongRec\songrec.exe"];

#[cfg(not(windows))]
pub const SONGREC_PATHS: &[&str] = &[
    "songrec", // In PATH
    "/usr/bin/songrec",
    "/usr/local/bin/songrec",
    "/opt/homebrew/bin/songrec",
];

/// An external tool and where to look for it
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Human-readable name used in errors
    pub name: &'static str,
    /// Argument that makes the tool print its version and exit 0
    pub version_arg: &'static str,
    /// Paths tried in order when no explicit path is configured
    pub candidates: &'static [&'static str],
}

pub const FPCALC: ToolSpec = ToolSpec {
    name: "fpcalc",
    version_arg: "-version",
    candidates: FPCALC_PATHS,
};

pub const SONGREC: ToolSpec = ToolSpec {
    name: "songrec",
    version_arg: "--version",
    candidates: SONGREC_PATHS,
};

fn responds(program: &Path, version_arg: &str) -> bool {
    Command::new(program)
        .arg(version_arg)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Find the executable, checking the configured path first, then common locations.
pub fn locate(spec: &ToolSpec, configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        return responds(path, spec.version_arg).then(|| path.to_path_buf());
    }

    spec.candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| responds(path, spec.version_arg))
}

/// Get the tool's version string (for `check-tools`)
pub fn version(spec: &ToolSpec, configured: Option<&Path>) -> Option<String> {
    let program = locate(spec, configured)?;
    Command::new(program)
        .arg(spec.version_arg)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            let out = String::from_utf8_lossy(&o.stdout).trim().to_string();
            if out.is_empty() {
                String::from_utf8_lossy(&o.stderr).trim().to_string()
            } else {
                out
            }
        })
}

/// Print installation instructions for a missing tool
pub fn print_install_instructions(spec: &ToolSpec) {
    eprintln!("Error: {} not found.", spec.name);
    match spec.name {
        "fpcalc" => {
            eprintln!("Install Chromaprint:");
            eprintln!("  Windows: winget install AcoustID.Chromaprint");
            eprintln!("  macOS:   brew install chromaprint");
            eprintln!("  Linux:   apt install libchromaprint-tools");
        }
        _ => {
            eprintln!("Install SongRec:");
            eprintln!("  cargo install songrec");
            eprintln!("  Linux:   flatpak install flathub com.github.marinm.songrec");
        }
    }
}

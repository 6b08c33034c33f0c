//! Environment checks and config file creation.

use std::path::Path;

use crate::config::{self, Config};
use crate::recognition::tools::{self, FPCALC, SONGREC};

/// Check that the external recognition tools are installed
pub fn cmd_check_tools(config: &Config) -> anyhow::Result<()> {
    println!("Checking recognition tools...\n");

    let checks = [
        (&SONGREC, config.recognition.songrec_path.as_deref(), "shazam"),
        (&FPCALC, config.recognition.fpcalc_path.as_deref(), "acoustid"),
    ];
    for (spec, configured, backend) in checks {
        match tools::version(spec, configured) {
            Some(version) => println!("✓ {} ({} backend): {}", spec.name, backend, version),
            None => {
                println!("✗ {} ({} backend): NOT FOUND", spec.name, backend);
                tools::print_install_instructions(spec);
            }
        }
    }

    println!();
    println!("API Keys:");
    if std::env::var("ACOUSTID_API_KEY").is_ok() {
        println!("✓ ACOUSTID_API_KEY: set");
    } else if config.credentials.acoustid_api_key.is_some() {
        println!("✓ acoustid_api_key: set in config file");
    } else {
        println!("✗ ACOUSTID_API_KEY: not set (only needed for --backend acoustid)");
        println!("  Get one at: https://acoustid.org/new-application");
    }

    Ok(())
}

/// Write the default configuration to `path` (or the default location)
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let Some(path) = path.map(Path::to_path_buf).or_else(config::config_path) else {
        anyhow::bail!("Could not determine config directory; pass --config <path>");
    };

    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }

    config::save(&Config::default(), &path)?;
    println!("Wrote default config to {:?}", path);
    Ok(())
}

//! auto-tag - recognize audio files, then rename, move and tag them.
//!
//! Each file is sent to a recognition service (Shazam through SongRec, or
//! AcoustID through fpcalc). The answer is turned into a safe
//! `Title - Artist - Album.ext` name (or an `Artist/Album/Title.ext` tree),
//! the file is moved or copied there, and its tags and cover art are written.

pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod organizer;
pub mod recognition;
pub mod scanner;
pub mod tagger;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let directive = if args.verbose {
        "auto_tag=debug"
    } else {
        "auto_tag=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    cli::run_command(&args)
}

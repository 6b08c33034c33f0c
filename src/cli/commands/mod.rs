//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `recognize`: batch recognition, renaming and tagging of a directory
//! - `apply`: execute a reviewed plan file
//! - `identify`: recognize a single file without changing it
//! - `tools`: external tool checks and config file creation

mod apply;
mod identify;
mod recognize;
mod tools;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config, OutputConfig};
use crate::organizer::{Layout, Placement, TransferMode};
use crate::recognition::Backend;

pub use apply::cmd_apply;
pub use identify::cmd_identify;
pub use recognize::cmd_recognize;
pub use tools::{cmd_check_tools, cmd_init_config};

/// Recognize audio files, then rename, move and tag them
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where results go; overrides the `[output]` config section
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Move renamed files under this directory instead of next to the source
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy files into this directory instead of moving them
    #[arg(long)]
    pub copy_to: Option<PathBuf>,

    /// Use an Artist/Album/Title.ext tree
    #[arg(long)]
    pub plex: bool,
}

impl OutputArgs {
    pub fn placement(&self, config: &OutputConfig) -> Placement {
        let mut placement = config.placement();
        if self.plex {
            placement.layout = Layout::Plex;
        }
        if let Some(dir) = &self.output {
            placement.output_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.copy_to {
            placement.copy_to = Some(dir.clone());
        }
        placement
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Recognize every audio file in a directory, then rename and tag it
    Recognize {
        /// Directory (or single file) to process
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only show what would happen; nothing is moved or tagged
        #[arg(long)]
        dry_run: bool,

        /// Seconds between recognition attempts [config default: 10]
        #[arg(short, long)]
        delay: Option<u64>,

        /// Recognition attempts per file [config default: 3]
        #[arg(short = 'n', long)]
        retries: Option<u32>,

        /// Comma-separated extensions to process [config default: mp3,ogg]
        #[arg(short, long)]
        extensions: Option<String>,

        #[command(flatten)]
        output: OutputArgs,

        /// Recognition service
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// AcoustID API key (or set ACOUSTID_API_KEY env var)
        #[arg(long, env = "ACOUSTID_API_KEY")]
        api_key: Option<String>,

        /// Write a reviewable plan of the run to this JSON file
        #[arg(long)]
        plan: Option<PathBuf>,
    },
    /// Execute a plan written by `recognize --plan`
    Apply {
        /// Plan file
        plan: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Recognize one file and show the result without changing anything
    Identify {
        /// Path to the audio file
        path: PathBuf,

        /// Recognition service
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// AcoustID API key (or set ACOUSTID_API_KEY env var)
        #[arg(long, env = "ACOUSTID_API_KEY")]
        api_key: Option<String>,
    },
    /// Check that fpcalc/songrec are installed and an API key is available
    CheckTools,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref());

    match &cli.command {
        Commands::Recognize {
            dir,
            dry_run,
            delay,
            retries,
            extensions,
            output,
            backend,
            api_key,
            plan,
        } => {
            let rt = Runtime::new()?;
            let options = recognize::RecognizeOptions {
                dir,
                dry_run: *dry_run,
                delay: *delay,
                retries: *retries,
                extensions: extensions.as_deref(),
                output,
                backend: *backend,
                api_key: api_key.as_deref(),
                plan: plan.as_deref(),
            };
            cmd_recognize(&rt, &config, &options)
        }
        Commands::Apply { plan, output } => {
            let rt = Runtime::new()?;
            cmd_apply(&rt, &config, plan, output)
        }
        Commands::Identify {
            path,
            backend,
            api_key,
        } => {
            let rt = Runtime::new()?;
            cmd_identify(&rt, &config, path, *backend, api_key.as_deref())
        }
        Commands::CheckTools => cmd_check_tools(&config),
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), *force),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// API key from the command line, falling back to the config file
pub(crate) fn resolve_api_key<'a>(cli_key: Option<&'a str>, config: &'a Config) -> Option<&'a str> {
    cli_key
        .filter(|k| !k.is_empty())
        .or(config.credentials.acoustid_api_key.as_deref())
}

/// Label printed in front of each transferred file
pub(crate) fn transfer_verb(placement: &Placement, dry_run: bool) -> &'static str {
    match (TransferMode::for_placement(placement), dry_run) {
        (TransferMode::Move, false) => "MOVED",
        (TransferMode::Move, true) => "WOULD MOVE",
        (TransferMode::Copy, false) => "COPIED",
        (TransferMode::Copy, true) => "WOULD COPY",
    }
}

/// Progress bar in the style used by all batch commands
pub(crate) fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

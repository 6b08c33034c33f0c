//! Command-line interface for auto-tag.
//!
//! This module provides the `recognize`, `apply`, `identify`, `check-tools`
//! and `init-config` commands.

mod commands;

pub use commands::{Cli, Commands, run_command};

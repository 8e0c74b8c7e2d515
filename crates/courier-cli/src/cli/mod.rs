//! CLI command definitions for the `courier` binary.
//!
//! Uses clap derive macros for argument parsing. Every read command renders
//! either a styled table or, with `--json`, machine-readable output.

pub mod chats;
pub mod config;
pub mod history;
pub mod ingest;
pub mod show;
pub mod status;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Browse and feed the per-conversation message store.
#[derive(Parser)]
#[command(name = "courier", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (defaults to ~/.courier/config.toml).
    #[arg(long = "config", id = "config_path", global = true, value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List conversations, most recent first.
    #[command(alias = "ls")]
    Chats,

    /// Show the message history of one conversation.
    History {
        /// Conversation identifier.
        conversation: String,
    },

    /// Show a single message.
    Show {
        /// Conversation identifier.
        conversation: String,

        /// Message identifier within the conversation.
        message_id: String,
    },

    /// Ingest JSON-lines message events from a file, or `-` for stdin.
    Ingest {
        /// Input file, one JSON event per line.
        input: String,
    },

    /// Store status: location, counts, and load report.
    Status,

    /// Inspect or create the settings file.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings (file plus environment overrides).
    Show,

    /// Write a settings file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared formatting helpers
// ---------------------------------------------------------------------------

/// Shorten `text` to at most `max` characters, marking the cut with "...".
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Render unix seconds as UTC wall-clock time.
pub(crate) fn format_timestamp(seconds: i64) -> String {
    match DateTime::<Utc>::from_timestamp(seconds, 0) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => seconds.to_string(),
    }
}

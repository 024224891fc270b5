//! CLI module for Oppsum.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Oppsum - Video Summarization
///
/// A CLI tool that turns a video URL into a short textual summary, using
/// platform captions when available and speech recognition otherwise.
/// The name "Oppsum" comes from the Norwegian "oppsummere," to summarize.
#[derive(Parser, Debug)]
#[command(name = "oppsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a video from its URL
    Summarize {
        /// Video URL (watch, short-link, embed, or mobile form)
        url: String,

        /// Maximum characters per transcript chunk (overrides config)
        #[arg(long)]
        max_chars: Option<usize>,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Emit the full outcome as JSON, including per-chunk results
        #[arg(long)]
        json: bool,
    },

    /// Fetch a video's transcript without summarizing it
    Transcript {
        /// Video URL (watch, short-link, embed, or mobile form)
        url: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Emit the transcript as JSON with provenance metadata
        #[arg(long)]
        json: bool,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "summarization.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

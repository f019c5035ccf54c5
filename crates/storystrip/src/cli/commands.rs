//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storystrip_core::{DEFAULT_STYLE, PanelSize};

/// Storystrip - turn a short narrative into a four-panel comic strip
#[derive(Parser, Debug)]
#[command(name = "storystrip")]
#[command(about = "Turn a short narrative into a four-panel comic strip", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a storystrip.toml configuration file
    #[arg(short, long, global = true, env = "STORYSTRIP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a strip panel by panel, reviewing each candidate image
    Run {
        /// Narrative summary (reads stdin when omitted)
        #[arg(short, long)]
        summary: Option<String>,

        /// Read the summary from a file
        #[arg(long, conflicts_with = "summary")]
        summary_file: Option<PathBuf>,

        /// Art-style modifier, e.g. "noir"
        #[arg(long, default_value = DEFAULT_STYLE)]
        style: String,

        /// Directory for candidate panels and the final strip
        #[arg(short, long, default_value = "strip")]
        output: PathBuf,

        /// Accept every candidate without prompting
        #[arg(long)]
        auto_accept: bool,

        /// Retries per request after an upstream failure in auto-accept mode
        #[arg(long, default_value_t = 2)]
        max_retries: u32,
    },

    /// Draft all four panel scripts in a single request and print them
    Script {
        /// Narrative summary (reads stdin when omitted)
        #[arg(short, long)]
        summary: Option<String>,

        /// Read the summary from a file
        #[arg(long, conflicts_with = "summary")]
        summary_file: Option<PathBuf>,

        /// Art-style modifier, e.g. "noir"
        #[arg(long, default_value = DEFAULT_STYLE)]
        style: String,
    },

    /// Stitch four existing panel images into one strip
    Stitch {
        /// Panel images in strip order
        #[arg(num_args = 4, required = true)]
        panels: Vec<PathBuf>,

        /// Output PNG path
        #[arg(short, long, default_value = "strip.png")]
        output: PathBuf,

        /// Panel size, e.g. 1024x1024 (defaults to the configured image size)
        #[arg(long)]
        size: Option<PanelSize>,
    },

    /// List suggested style modifiers
    Styles,
}

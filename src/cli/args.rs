//! Command line argument parsing for the Polydict CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::server::FailurePolicy;
use crate::server::decode::DEFAULT_ENCODING;

/// Polydict - tokenize text with every installed dictionary
#[derive(Parser, Debug, Clone)]
#[command(name = "polydict")]
#[command(about = "A dictionary-agnostic tokenizer and tokenization server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Polydict Contributors")]
#[command(long_about = None)]
pub struct PolydictArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PolydictArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP tokenization server
    Serve(ServeArgs),

    /// Tokenize text with one dictionary or all of them
    Tokenize(TokenizeArgs),

    /// List the registered dictionaries
    Dictionaries(DictionariesArgs),
}

/// Arguments for the server
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Server configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "POLYDICT_HOST")]
    pub host: Option<String>,

    /// HTTP port
    #[arg(short, long, env = "POLYDICT_PORT")]
    pub port: Option<u16>,

    /// Behavior when one dictionary fails to tokenize
    #[arg(long)]
    pub failure_policy: Option<FailurePolicy>,

    /// Command rendering lattice graphs to SVG
    #[arg(long, conflicts_with = "no_render")]
    pub render_command: Option<String>,

    /// Disable lattice rendering
    #[arg(long)]
    pub no_render: bool,

    /// Upper bound on a single render, in milliseconds
    #[arg(long)]
    pub render_timeout_ms: Option<u64>,

    /// Dictionaries to serve (comma-separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub dictionaries: Vec<String>,

    /// Construct every engine before accepting requests
    #[arg(long)]
    pub preload: bool,
}

/// Arguments for tokenizing
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    /// Percent-encoded text to tokenize
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Dictionary to use (default: all dictionaries)
    #[arg(short, long)]
    pub dictionary: Option<String>,

    /// Request mode
    #[arg(short, long, default_value = "0")]
    pub mode: i32,

    /// Charset of the percent-encoded bytes
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,
}

/// Arguments for listing dictionaries
#[derive(Parser, Debug, Clone)]
pub struct DictionariesArgs {
    /// Show identities and feature names
    #[arg(short, long)]
    pub long: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl ServeArgs {
    /// Check if lattice rendering stays enabled
    pub fn render_enabled(&self) -> bool {
        !self.no_render
    }
}

//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::CliArgs;

/// repoglance - key file selection and chunked summaries for repositories
#[derive(Debug, Parser)]
#[command(name = "repoglance")]
#[command(about = "Select a repository's key files within a byte budget and summarize them")]
#[command(long_about = r#"
repoglance picks the files that best describe a repository (documentation,
configuration, entry points, core source directories) within a strict byte
budget, splits them into bounded chunks and, when a summarizer is configured,
asks a language model about each chunk in turn.

EXAMPLES:
  # List the key files that would be summarized
  repoglance select ./my-project

  # Show how the key files are split into chunks
  repoglance chunk ./my-project --chunk-tokens 4000

  # Full analysis without model calls, as canonical JSON
  repoglance analyze ./my-project --offline --json

  # Show the effective configuration and where each value came from
  repoglance config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  The config file is discovered by searching upward from the current directory
  for .repoglance/config.toml. Use --config to give an explicit path.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Aggregate byte budget for selected key files
    #[arg(long, global = true)]
    pub max_total_bytes: Option<usize>,

    /// Per-file byte cap; larger files are truncated
    #[arg(long, global = true)]
    pub max_file_bytes: Option<usize>,

    /// Token budget for one summarizer chunk
    #[arg(long, global = true)]
    pub chunk_tokens: Option<usize>,

    /// Summarizer provider: anthropic or none
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// Model to use for summarizer calls
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the key files selected from a repository
    Select {
        /// Repository root directory
        path: PathBuf,

        /// Output canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how the selected key files are split into chunks
    Chunk {
        /// Repository root directory
        path: PathBuf,

        /// Output canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a repository: overview, key files, chunk summaries, findings
    Analyze {
        /// Repository root directory
        path: PathBuf,

        /// Skip the summarizer even if one is configured
        #[arg(long)]
        offline: bool,

        /// Output canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration with value sources
    Config {
        /// Output canonical JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation label used in error reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Chunk { .. } => "chunk",
            Self::Analyze { .. } => "analyze",
            Self::Config { .. } => "config",
        }
    }
}

impl Cli {
    /// Overrides for configuration discovery. Unset flags stay `None` so
    /// they do not mask config file values.
    #[must_use]
    pub fn to_cli_args(&self) -> CliArgs {
        CliArgs {
            config_path: self.config.clone(),
            verbose: self.verbose.then_some(true),
            max_total_bytes: self.max_total_bytes,
            max_file_bytes: self.max_file_bytes,
            chunk_max_tokens: self.chunk_tokens,
            llm_provider: self.llm_provider.clone(),
            model: self.model.clone(),
        }
    }
}

/// Build the clap command (used for completion generation and tests).
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}

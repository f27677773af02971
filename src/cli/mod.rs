//! CLI module for Strata
//!
//! Command-line parsing for the `strata` binary. Uses clap for argument
//! parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strata - multi-agent deep research
///
/// Scopes a research request with the user, delegates topics to parallel
/// researchers and writes a cited markdown report.
#[derive(Parser, Debug)]
#[command(
    name = "strata",
    version,
    about = "Strata - multi-agent deep research",
    long_about = "Strata - multi-agent deep research\n\n\
                  Scopes a research request with the user, delegates topics to parallel\n\
                  web researchers and writes a cited markdown report.",
    after_help = "EXAMPLES:\n    \
                  strata run \"Compare tokio and async-std\"   # Research a question\n    \
                  strata config --validate                   # Check strata.toml\n    \
                  strata --config my.toml run \"...\"          # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "strata.toml", global = true)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a request and write the report
    ///
    /// The request may be given as arguments or typed at the prompt.
    Run {
        /// The research request
        request: Vec<String>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file and list warnings
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

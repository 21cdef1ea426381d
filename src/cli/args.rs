//! CLI argument definitions using clap
//!
//! - gmha                         interactive session
//! - gmha cluster list            one-shot command
//! - gmha --store <path> ...      use another store file

use clap::Parser;
use std::path::PathBuf;

/// gmha - cluster topology register for database HA clusters
#[derive(Parser, Debug)]
#[command(name = "gmha")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file [default: ./gmha.json if present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store file, overrides `store_path` from the configuration
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log filter (e.g. "info", "gmha=debug"), overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    /// Command to run once, e.g. `cluster demo host list`.
    /// Starts an interactive session when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn is_interactive(&self) -> bool {
        self.command.is_empty()
    }
}

//! CLI module for gmha
//!
//! Provides the command-line shell around the topology core:
//! - argument parsing and configuration
//! - logging setup
//! - interactive session (prompt, one line at a time)
//! - one-shot mode (all arguments form a single command)

mod args;
mod commands;
mod config;
mod errors;
mod session;

pub use args::Cli;
pub use commands::{load_config, open_store, run, run_cli};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use session::{run_interactive, run_one_shot};

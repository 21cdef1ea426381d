//! CLI entry point
//!
//! Startup order:
//! 1. Parse arguments
//! 2. Load configuration (file, then command-line overrides)
//! 3. Initialize logging
//! 4. Open the store; failure here is the only fatal data error
//! 5. Run one command or the interactive loop

use std::io;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::topology::TopologyStore;

use super::args::Cli;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::session::{run_interactive, run_one_shot};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the selected mode.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_cli(cli)
}

/// Run with already parsed arguments
pub fn run_cli(cli: Cli) -> CliResult<()> {
    let config = load_config(&cli)?;
    init_logging(cli.log_level.as_deref(), &config.log_level);

    let store = open_store(&config)?;

    let stdout = io::stdout();
    if cli.is_interactive() {
        let stdin = io::stdin();
        run_interactive(&store, &config, stdin.lock(), stdout.lock())
    } else {
        run_one_shot(&store, &config, &cli.command, stdout.lock())
    }
}

/// Resolve the configuration file and apply `--store`.
pub fn load_config(cli: &Cli) -> CliResult<Config> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    Ok(config)
}

/// Open the configured store file.
pub fn open_store(config: &Config) -> CliResult<TopologyStore> {
    TopologyStore::open(&config.store_path).map_err(|e| {
        error!(code = e.code(), error = %e, "store open failed");
        CliError::store_open_failed(format!(
            "Failed to open store {}: {}",
            config.store_path.display(),
            e
        ))
    })
}

/// Logs go to stderr so they never mix with command output.
///
/// Precedence: `--log-level`, then RUST_LOG, then the configured level.
fn init_logging(cli_level: Option<&str>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config_level)),
    }
    .unwrap_or_else(|_| EnvFilter::new("warn"));

    // a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

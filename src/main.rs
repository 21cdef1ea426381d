//! gmha CLI entry point
//!
//! Delegates everything to the CLI module, prints errors to stderr and
//! exits with non-zero on failure.

use gmha::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

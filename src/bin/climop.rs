//! climop CLI
//!
//! Declares, validates and inspects operator contracts without touching
//! any datasets. Useful for checking declaration files in CI and for
//! looking at what a command template implies.
//!
//! # Usage
//!
//! ```bash
//! climop inspect 'cdo timavg ${in} ${out}'
//! climop check operators.toml --standard
//! climop list --standard
//! ```

use climop::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // Set up logging on stderr; stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

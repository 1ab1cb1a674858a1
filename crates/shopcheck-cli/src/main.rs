//! Shopcheck CLI: run storefront scenarios
//!
//! ## Usage
//!
//! ```bash
//! shopcheck list                          # Show the scenario catalogue
//! shopcheck run                           # Every scenario on the simulated shop
//! shopcheck run --tag smoke --format json # Smoke scenarios, JSON report
//! shopcheck run --backend chromium        # Real browser (feature `browser`)
//! shopcheck fixtures --format yaml        # Dump the effective fixtures
//! ```

use clap::Parser;
use shopcheck_cli::{execute, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

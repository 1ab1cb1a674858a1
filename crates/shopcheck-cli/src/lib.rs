//! Shopcheck CLI library
//!
//! Command-line front end for the shopcheck scenario runner.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod runner;

pub use commands::{
    BackendArg, Cli, ColorArg, Commands, FixturesArgs, FixturesFormat, ListArgs, LogFormatArg,
    ReportFormat, RunArgs, TagArg,
};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_scenario_list, ProgressReporter, RunDocument};

/// Configuration from the global flags
#[must_use]
pub fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_log_format(cli.log_format.into())
}

/// Dispatch a parsed command line
pub fn execute(cli: &Cli) -> CliResult<()> {
    let config = build_config(cli);
    logging::init(&config)?;
    tracing::debug!(?config, "cli configured");
    match cli.command {
        Commands::Run(ref args) => runner::run_scenarios(&config, args),
        Commands::List(ref args) => runner::list_scenarios(args),
        Commands::Fixtures(ref args) => runner::show_fixtures(args),
    }
}

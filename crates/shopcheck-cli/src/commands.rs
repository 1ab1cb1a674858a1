//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use shopcheck::scenario::{Backend, Tag};
use std::path::PathBuf;

/// Shopcheck: verify the Swag Labs storefront flow end to end
#[derive(Parser, Debug)]
#[command(name = "shopcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against a backend
    Run(RunArgs),

    /// List the scenario catalogue
    List(ListArgs),

    /// Print the effective fixtures
    Fixtures(FixturesArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Automation backend
    #[arg(short, long, default_value = "sim", env = "SHOPCHECK_BACKEND")]
    pub backend: BackendArg,

    /// Storefront base URL
    #[arg(long, env = "SHOPCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Run every scenario with the mobile profile
    #[arg(long)]
    pub mobile: bool,

    /// Show the browser window (chromium only)
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable (chromium only)
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Disable the chromium sandbox (containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Screen and element timeout in milliseconds
    #[arg(long, env = "SHOPCHECK_TIMEOUT_MS")]
    pub timeout: Option<u64>,

    /// Fixture file (.json, .yaml or .yml); built-in fixtures otherwise
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Only scenarios carrying this tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<TagArg>,

    /// Only scenarios with this name (repeatable)
    #[arg(short, long = "scenario")]
    pub scenarios: Vec<String>,

    /// Result format on stdout
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only scenarios carrying this tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<TagArg>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the fixtures command
#[derive(Parser, Debug)]
pub struct FixturesArgs {
    /// Fixture file to load and validate; built-in fixtures otherwise
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: FixturesFormat,
}

/// Backend choice
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendArg {
    /// In-memory storefront
    #[default]
    Sim,
    /// Chromium over CDP
    Chromium,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sim => Self::Sim,
            BackendArg::Chromium => Self::Chromium,
        }
    }
}

/// Scenario tag
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagArg {
    /// Quick confidence checks
    Smoke,
    /// Refusals and validation errors
    Negative,
    /// Mobile profile runs
    Mobile,
    /// Whole purchase
    E2e,
}

impl From<TagArg> for Tag {
    fn from(arg: TagArg) -> Self {
        match arg {
            TagArg::Smoke => Self::Smoke,
            TagArg::Negative => Self::Negative,
            TagArg::Mobile => Self::Mobile,
            TagArg::E2e => Self::E2e,
        }
    }
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Fixture dump format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FixturesFormat {
    /// JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Color choice argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl From<LogFormatArg> for crate::config::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["shopcheck", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.backend, BackendArg::Sim);
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.tags.is_empty());
                assert!(!args.mobile);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_run_selection_flags() {
        let cli = Cli::try_parse_from([
            "shopcheck", "-vv", "run", "--tag", "smoke", "--tag", "e2e", "-s", "logout",
            "--format", "json", "--mobile",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.tags, vec![TagArg::Smoke, TagArg::E2e]);
        assert_eq!(args.scenarios, vec!["logout".to_string()]);
        assert_eq!(args.format, ReportFormat::Json);
        assert!(args.mobile);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!(Cli::try_parse_from(["shopcheck", "run", "--tag", "slow"]).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Backend::from(BackendArg::Chromium), Backend::Chromium);
        assert_eq!(Tag::from(TagArg::Negative), Tag::Negative);
    }
}

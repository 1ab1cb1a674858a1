//! Command handlers

use crate::commands::{FixturesArgs, FixturesFormat, ListArgs, ReportFormat, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_scenario_list, ProgressReporter, RunDocument};
use shopcheck::scenario::{self, Backend, RunReport, Runner, Tag};
use shopcheck::{Fixtures, SessionConfig};
use std::path::Path;
use std::time::Instant;

/// Fixtures from a file, or the built-in set
pub fn load_fixtures(path: Option<&Path>) -> CliResult<Fixtures> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading fixtures");
            Ok(Fixtures::load(path)?)
        }
        None => Ok(Fixtures::builtin()),
    }
}

/// Session configuration: `SHOPCHECK_*` environment first, run flags on top
pub fn session_config(args: &RunArgs) -> CliResult<SessionConfig> {
    apply_run_flags(SessionConfig::from_env()?, args)
}

/// Override `config` with whatever run flags were given
pub fn apply_run_flags(mut config: SessionConfig, args: &RunArgs) -> CliResult<SessionConfig> {
    if args.headed {
        config = config.with_headless(false);
    }
    if let Some(ref url) = args.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CliError::invalid_argument(format!(
                "base URL must start with http:// or https://, got {url:?}"
            )));
        }
        config = config.with_base_url(url.trim_end_matches('/'));
    }
    if args.mobile {
        config = config.mobile();
    }
    if let Some(ref path) = args.chromium_path {
        config = config.with_chromium_path(path.to_string_lossy());
    }
    if args.no_sandbox {
        config = config.with_no_sandbox();
    }
    if let Some(ms) = args.timeout {
        if ms == 0 {
            return Err(CliError::invalid_argument("timeout must be positive"));
        }
        config = config.with_screen_timeout(ms).with_element_timeout(ms);
    }
    Ok(config)
}

/// `shopcheck run`
pub fn run_scenarios(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let tags: Vec<Tag> = args.tags.iter().copied().map(Tag::from).collect();
    let selected = scenario::select(&args.scenarios, &tags)?;
    if selected.is_empty() {
        return Err(CliError::invalid_argument(
            "no scenario matches the given names and tags",
        ));
    }
    let fixtures = load_fixtures(args.fixtures.as_deref())?;
    let session_config = session_config(args)?;
    let backend = Backend::from(args.backend);
    let base_url = session_config.base_url.clone();
    let runner = Runner::new(backend, session_config, fixtures);

    let json = args.format == ReportFormat::Json;
    let mut reporter = ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet() || json,
    );
    reporter.info(&format!(
        "running {} scenarios on {backend} against {base_url}",
        selected.len()
    ));
    reporter.start_progress(selected.len() as u64, "starting");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("Failed to create runtime: {e}")))?;
    let start = Instant::now();
    let mut report = RunReport::default();
    rt.block_on(async {
        for scenario in &selected {
            reporter.set_message(scenario.name);
            let result = runner.run_one(scenario).await;
            reporter.scenario(&result);
            reporter.increment();
            report.results.push(result);
        }
    });
    report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    reporter.finish();

    let document = RunDocument::new(backend, &base_url, &report);
    if let Some(ref path) = args.output {
        std::fs::write(path, document.to_json()?)?;
        tracing::info!(path = %path.display(), "report written");
    }
    if json {
        println!("{}", document.to_json()?);
    } else {
        reporter.summary(&report);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: report.failed(),
            total: report.results.len(),
        })
    }
}

/// `shopcheck list`
pub fn list_scenarios(args: &ListArgs) -> CliResult<()> {
    let tags: Vec<Tag> = args.tags.iter().copied().map(Tag::from).collect();
    let selected = scenario::select(&[], &tags)?;
    match args.format {
        ReportFormat::Text => print!("{}", render_scenario_list(&selected)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&selected)?),
    }
    Ok(())
}

/// `shopcheck fixtures`
pub fn show_fixtures(args: &FixturesArgs) -> CliResult<()> {
    let fixtures = load_fixtures(args.fixtures.as_deref())?;
    fixtures.validate()?;
    match args.format {
        FixturesFormat::Json => println!("{}", serde_json::to_string_pretty(&fixtures)?),
        FixturesFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&fixtures)?),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["shopcheck", "run"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Run(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_session_config_from_flags() {
        let config = apply_run_flags(SessionConfig::default(), &run_args(&[
            "--base-url",
            "http://localhost:3000/",
            "--mobile",
            "--timeout",
            "2500",
            "--no-sandbox",
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.device.is_mobile);
        assert_eq!(config.screen_timeout_ms, 2500);
        assert_eq!(config.element_timeout_ms, 2500);
        assert!(!config.sandbox);
        assert!(config.headless);
    }

    #[test]
    fn test_environment_is_the_base_layer() {
        let env = |key: &str| match key {
            "SHOPCHECK_HEADLESS" => Some("false".to_string()),
            "SHOPCHECK_TIMEOUT_MS" => Some("1200".to_string()),
            _ => None,
        };
        let base = SessionConfig::default().overlay(env).unwrap();
        let config = apply_run_flags(base.clone(), &run_args(&[])).unwrap();
        assert!(!config.headless);
        assert_eq!(config.screen_timeout_ms, 1200);

        let config = apply_run_flags(base, &run_args(&["--timeout", "900"])).unwrap();
        assert_eq!(config.screen_timeout_ms, 900);
    }

    #[test]
    fn test_headed_flag_overrides_headless_default() {
        let config = apply_run_flags(SessionConfig::default(), &run_args(&["--headed"])).unwrap();
        assert!(!config.headless);
    }

    #[test]
    fn test_bad_base_url() {
        let err = session_config(&run_args(&["--base-url", "saucedemo.com"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_zero_timeout() {
        assert!(session_config(&run_args(&["--timeout", "0"])).is_err());
    }

    #[test]
    fn test_builtin_fixtures_without_path() {
        let fixtures = load_fixtures(None).unwrap();
        assert_eq!(fixtures.products.len(), 6);
    }

    #[test]
    fn test_missing_fixture_file() {
        assert!(load_fixtures(Some(Path::new("/nonexistent/fixtures.json"))).is_err());
    }
}

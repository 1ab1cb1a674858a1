//! Output formatting and progress reporting

use chrono::{DateTime, Utc};
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use shopcheck::scenario::{Backend, RunReport, Scenario, ScenarioResult};
use std::fmt::Write as _;

/// JSON document written for a run
#[derive(Debug, Serialize)]
pub struct RunDocument<'a> {
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    /// Backend used
    pub backend: Backend,
    /// Storefront base URL
    pub base_url: &'a str,
    /// Passed count
    pub passed: usize,
    /// Failed count
    pub failed: usize,
    /// Per-scenario outcomes
    #[serde(flatten)]
    pub report: &'a RunReport,
}

impl<'a> RunDocument<'a> {
    /// Wrap a finished report
    #[must_use]
    pub fn new(backend: Backend, base_url: &'a str, report: &'a RunReport) -> Self {
        Self {
            generated_at: Utc::now(),
            backend,
            base_url,
            passed: report.passed(),
            failed: report.failed(),
            report,
        }
    }

    /// Pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Console reporter for scenario runs
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new reporter writing to stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar on stderr
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Show which scenario is running
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Advance the bar by one
    pub fn increment(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Remove the bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = self.term.write_line(text);
            }),
            None => {
                let _ = self.term.write_line(text);
            }
        }
    }

    /// Print one scenario outcome
    pub fn scenario(&self, result: &ScenarioResult) {
        if result.passed {
            if self.quiet {
                return;
            }
            let prefix = if self.use_color {
                style("✓").green().bold().to_string()
            } else {
                "PASS".to_string()
            };
            self.line(&format!(
                "{prefix} {} ({}ms)",
                result.name, result.duration_ms
            ));
        } else {
            let prefix = if self.use_color {
                style("✗").red().bold().to_string()
            } else {
                "FAIL".to_string()
            };
            let error = result.error.as_deref().unwrap_or("unknown failure");
            self.line(&format!("{prefix} {}: {error}", result.name));
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// Print the run summary
    pub fn summary(&self, report: &RunReport) {
        let passed = report.passed();
        let failed = report.failed();
        if self.quiet && failed == 0 {
            return;
        }
        let total = passed + failed;
        let secs = report.duration_ms as f64 / 1000.0;

        let _ = self.term.write_line("");
        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            let _ = self.term.write_line(&format!(
                "{status} {total} scenarios in {secs:.2}s ({} passed, {} failed)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} scenarios in {secs:.2}s ({passed} passed, {failed} failed)"
            ));
        }
    }
}

/// Scenario table for `list`
#[must_use]
pub fn render_scenario_list(scenarios: &[Scenario]) -> String {
    let width = scenarios.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for scenario in scenarios {
        let tags: Vec<&str> = scenario.tags.iter().map(|t| t.as_str()).collect();
        let _ = writeln!(
            out,
            "{:<width$}  {:<8}  {:<16}  {}",
            scenario.name,
            format!("{:?}", scenario.suite).to_lowercase(),
            tags.join(","),
            scenario.description,
        );
    }
    let _ = writeln!(out, "{} scenarios", scenarios.len());
    out
}

//! src/main.rs
//!
//! The entrypoint for the harness binary.
//!
//! It parses the command line, initializes tracing, loads the layered
//! configuration and hands the built-in suite to the library's `App`. The
//! process exit status is the run's `exit_code()`, or 2 if the harness
//! itself could not run.

use anyhow::Context as _;
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;
use unit_harness::{config::ConfigOverrides, features, App, Config, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "unit-harness")]
#[command(about = "Runs the registered test cases and reports the results")]
struct Cli {
    /// Verbose output: one line per test
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Minimal output: the summary only
    #[arg(short, long)]
    quiet: bool,
    /// Stop on the first failure or error
    #[arg(short, long)]
    failfast: bool,
    /// On Ctrl+C, finish the current test and report the results so far
    #[arg(short, long)]
    catch: bool,
    /// Buffer test output; it is shown only for failing tests
    #[arg(short, long)]
    buffer: bool,
    /// Only run tests whose `Case.method` name matches the pattern or substring
    #[arg(short = 'k', value_name = "PATTERN")]
    patterns: Vec<String>,
    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Tests to run, as `Case` or `Case.method`
    tests: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let verbosity = if self.verbose {
            Some(2)
        } else if self.quiet {
            Some(0)
        } else {
            None
        };

        ConfigOverrides {
            verbosity,
            failfast: self.failfast.then_some(true),
            catch_interrupt: self.catch.then_some(true),
            buffer: self.buffer.then_some(true),
            patterns: (!self.patterns.is_empty()).then(|| self.patterns.clone()),
            report_path: self.report.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only what the tests print.
    // `RUST_LOG=debug` shows every lifecycle phase.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Panics inside tests are caught and reported by the runner.
    std::panic::set_hook(Box::new(|info| {
        tracing::debug!(%info, "Test panicked");
    }));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(summary) => ExitCode::from(summary.exit_code()),
        Err(e) => {
            tracing::error!("💥 Harness failed to run: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let config = Config::load_with(&cli.overrides()).context("Failed to load configuration")?;
    let summary = App::new(config, features::suite())?
        .with_selection(cli.tests)
        .run()
        .await?;
    Ok(summary)
}

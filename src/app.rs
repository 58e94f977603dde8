//! src/app.rs
//!
//! Defines the main `App` struct, which owns the configuration and the suite
//! and drives one complete run: plan, execute, report.

use crate::{
    case::Suite,
    config::Config,
    domain::RunSummary,
    engine::{discovery, RunOptions, Runner},
    error::Result,
    report::{json, TextReporter},
};
use std::{future::Future, io};
use tokio_util::sync::CancellationToken;

/// Encapsulates one harness run: its configuration, the cases it can draw
/// from, and the token that stops it early.
pub struct App {
    config: Config,
    suite: Suite,
    selection: Vec<String>,
    shutdown_token: CancellationToken,
}

impl App {
    /// Creates a new `App`. Fails if any `-k` pattern is malformed.
    pub fn new(config: Config, suite: Suite) -> Result<Self> {
        discovery::compile_patterns(&config.patterns)?;
        Ok(Self {
            config,
            suite,
            selection: Vec::new(),
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Restricts the run to the named `Case` or `Case.method` entries.
    pub fn with_selection(mut self, selection: Vec<String>) -> Self {
        self.selection = selection;
        self
    }

    /// Cancelling this stops the run before the next test starts.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the selected tests and writes the reports.
    ///
    ///   1. Plans the run from the suite, selection and patterns.
    ///   2. Optionally listens for Ctrl+C and turns it into a cancellation.
    ///   3. Executes every test on a blocking task, printing the text report
    ///      to stderr as it goes.
    ///   4. Writes the JSON report if one was configured.
    pub async fn run(self) -> Result<RunSummary> {
        let plan = discovery::plan(
            &self.suite,
            &self.config.method_prefix,
            &self.selection,
            &self.config.patterns,
        )?;

        tracing::info!(
            cases = self.suite.len(),
            tests = plan.len(),
            "🚀 Starting harness..."
        );

        let interrupt_task = self.config.catch_interrupt.then(|| {
            let shutdown_token = self.shutdown_token.clone();
            tokio::spawn(async move {
                match catch_interrupts(tokio::signal::ctrl_c, shutdown_token).await {
                    Ok(()) => std::process::exit(130),
                    Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
                }
            })
        });

        let runner = Runner::new(RunOptions::from(&self.config), self.shutdown_token.clone());
        let verbosity = self.config.verbosity;
        let suite = self.suite;

        let summary = tokio::task::spawn_blocking(move || -> Result<RunSummary> {
            let mut reporter = TextReporter::new(io::stderr(), verbosity);
            let summary = runner.run(&suite, &plan, &mut reporter);
            reporter.print_summary(&summary)?;
            Ok(summary)
        })
        .await??;

        if let Some(task) = interrupt_task {
            task.abort();
        }

        if let Some(path) = &self.config.report_path {
            json::write_report(path, &summary)?;
        }

        tracing::info!(exit_code = summary.exit_code(), "👋 Harness finished.");
        Ok(summary)
    }
}

/// Waits on `signal` twice. The first one cancels `shutdown_token`, so the run
/// stops once the current test returns; the function returns after the
/// second, and the caller aborts the process.
pub async fn catch_interrupts<F, Fut>(mut signal: F, shutdown_token: CancellationToken) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    signal().await?;
    tracing::warn!("Ctrl+C received. Stopping after the current test (press again to abort)...");
    shutdown_token.cancel();

    signal().await?;
    tracing::warn!("Second Ctrl+C received. Aborting.");
    Ok(())
}

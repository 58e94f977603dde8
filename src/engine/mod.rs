//! src/engine/mod.rs
//!
//! Defines the `Runner`, which executes planned tests one at a time through
//! instantiate -> set_up -> body -> tear_down and aggregates the results.
//!
//! Every phase runs inside `catch_unwind`, so a panicking test is recorded
//! against that test and the run carries on with the next one.

use crate::{
    case::{Context, RegisteredCase, Suite},
    config::Config,
    domain::{CaseResult, Fault, Phase, PhasedFault, RunSummary, TestId, TestRecord},
    report::ResultSink,
};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    time::Instant,
};
use tokio_util::sync::CancellationToken;

pub mod discovery;

/// The subset of `Config` the runner acts on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub failfast: bool,
    pub buffer: bool,
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            failfast: config.failfast,
            buffer: config.buffer,
        }
    }
}

pub struct Runner {
    options: RunOptions,
    cancel: CancellationToken,
}

impl Runner {
    /// `cancel` is checked before each test; cancelling it never interrupts
    /// a test that is already running. With `catch_interrupt`, the first
    /// Ctrl+C cancels it and a second one aborts the process (see
    /// [`crate::app::catch_interrupts`]).
    pub fn new(options: RunOptions, cancel: CancellationToken) -> Self {
        Self { options, cancel }
    }

    /// Runs `plan` in order. Plans from [`discovery::plan`] only name
    /// registered cases; a hand-built plan naming an unknown case records an
    /// error for that test instead of aborting.
    pub fn run(&self, suite: &Suite, plan: &[TestId], sink: &mut dyn ResultSink) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        tracing::info!(tests = plan.len(), "Starting test run");

        for id in plan {
            if self.cancel.is_cancelled() {
                tracing::warn!(next = %id, "Run interrupted. Skipping remaining tests.");
                summary.interrupted = true;
                break;
            }

            sink.start_test(id);
            let record = match suite.case(&id.case) {
                Some(case) => self.run_test(case, id),
                None => TestRecord::new(
                    id.clone(),
                    vec![PhasedFault {
                        phase: Phase::Instantiate,
                        fault: Fault::error(format!("no case named '{}' is registered", id.case)),
                    }],
                    None,
                    0.0,
                ),
            };
            sink.finish_test(&record);

            let stop = self.options.failfast && record.is_unsuccessful();
            summary.records.push(record);
            if stop {
                tracing::info!(test = %id, "Stopping after first failure (failfast)");
                break;
            }
        }

        summary.duration_secs = started.elapsed().as_secs_f64();
        tracing::info!(
            run = summary.tests_run(),
            failures = summary.failures(),
            errors = summary.errors(),
            skipped = summary.skipped(),
            "Test run finished"
        );
        summary
    }

    /// Runs one test on a fresh instance of its case.
    pub fn run_test(&self, case: &dyn RegisteredCase, id: &TestId) -> TestRecord {
        tracing::debug!(test = %id, "Running test");
        let started = Instant::now();
        let mut ctx = Context::new(self.options.buffer);
        let faults = run_lifecycle(case, &id.method, &mut ctx);
        TestRecord::new(
            id.clone(),
            faults,
            ctx.into_captured(),
            started.elapsed().as_secs_f64(),
        )
    }
}

fn run_lifecycle(case: &dyn RegisteredCase, method: &str, ctx: &mut Context) -> Vec<PhasedFault> {
    let mut faults = Vec::new();

    let mut fixture = match catch_unwind(AssertUnwindSafe(|| case.instantiate())) {
        Ok(fixture) => fixture,
        Err(payload) => {
            let fault = Fault::error(format!("panicked: {}", Fault::panic_message(&*payload)));
            faults.push(PhasedFault { phase: Phase::Instantiate, fault });
            return faults;
        }
    };

    // A set_up fault means neither the body nor tear_down runs. Anything
    // raised there is an error, never a failure; skips stay skips.
    if let Err(fault) = guarded(Phase::SetUp, || fixture.set_up(ctx)) {
        let fault = match fault {
            Fault::Failure(message) => Fault::Error(message),
            other => other,
        };
        faults.push(PhasedFault { phase: Phase::SetUp, fault });
        return faults;
    }

    if let Err(fault) = guarded(Phase::Call, || fixture.call(method, ctx)) {
        faults.push(PhasedFault { phase: Phase::Call, fault });
    }

    if let Err(fault) = guarded(Phase::TearDown, || fixture.tear_down(ctx)) {
        faults.push(PhasedFault { phase: Phase::TearDown, fault });
    }

    faults
}

fn guarded(phase: Phase, f: impl FnOnce() -> CaseResult) -> CaseResult {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => {
            if let Err(fault) = &result {
                tracing::debug!(%phase, %fault, "Phase did not complete");
            }
            result
        }
        Err(payload) => {
            let fault = Fault::from_panic(payload);
            tracing::debug!(%phase, %fault, "Caught panic");
            Err(fault)
        }
    }
}

//! tests/common/harness.rs
//!
//! Building blocks shared by the component and integration tests:
//! - `ScriptedCase`, a test case whose every phase behaves as a `Script` says
//!   and records what ran into a shared event log.
//! - Helpers to run a suite in memory and capture the text report.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tokio_util::sync::CancellationToken;
use unit_harness::{
    engine::{discovery, RunOptions, Runner},
    report::TextReporter,
    CaseResult, Context, Fault, RunSummary, Suite, TestCase, TestMethod,
};

pub type EventLog = Arc<Mutex<Vec<String>>>;

/// How one phase of a scripted test ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Pass,
    Fail,
    Error,
    Skip,
    Panic,
    AssertPanic,
}

impl Step {
    fn perform(self, phase: &str) -> CaseResult {
        match self {
            Step::Pass => Ok(()),
            Step::Fail => Err(Fault::failure(format!("{phase} check did not hold"))),
            Step::Error => Err(Fault::error(format!("{phase} blew up"))),
            Step::Skip => Err(Fault::skip(format!("{phase} asked to skip"))),
            Step::Panic => panic!("{phase} panicked"),
            Step::AssertPanic => {
                assert_eq!(1, 2, "{phase} assertion");
                Ok(())
            }
        }
    }
}

/// The behaviour of each phase of `ScriptedCase::test_body`.
#[derive(Clone, Copy, Debug)]
pub struct Script {
    pub set_up: Step,
    pub body: Step,
    pub tear_down: Step,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            set_up: Step::Pass,
            body: Step::Pass,
            tear_down: Step::Pass,
        }
    }
}

/// Declares `test_body` (scripted), `test_second` (checks that instances
/// are fresh) and `helper` (never discovered).
pub struct ScriptedCase {
    log: EventLog,
    script: Script,
    touched: bool,
    running_body: bool,
}

impl ScriptedCase {
    fn record(&self, event: &str) {
        self.log.lock().unwrap().push(event.to_string());
    }

    fn test_body(&mut self, ctx: &mut Context) -> CaseResult {
        self.record("body");
        self.touched = true;
        self.running_body = true;
        ctx.println("body output")?;
        self.script.body.perform("body")
    }

    fn test_second(&mut self, _ctx: &mut Context) -> CaseResult {
        self.record("second");
        unit_harness::ensure(!self.touched, "state leaked between tests")
    }

    fn helper(&mut self, _ctx: &mut Context) -> CaseResult {
        self.record("helper");
        Ok(())
    }
}

impl TestCase for ScriptedCase {
    const NAME: &'static str = "Scripted";

    fn methods() -> Vec<TestMethod<Self>> {
        vec![
            TestMethod::new("test_second", Self::test_second),
            TestMethod::new("helper", Self::helper),
            TestMethod::new("test_body", Self::test_body),
        ]
    }

    fn set_up(&mut self, _ctx: &mut Context) -> CaseResult {
        self.record("set_up");
        self.script.set_up.perform("set_up")
    }

    fn tear_down(&mut self, _ctx: &mut Context) -> CaseResult {
        self.record("tear_down");
        // Only the scripted test gets a scripted tear_down.
        if self.running_body {
            self.script.tear_down.perform("tear_down")
        } else {
            Ok(())
        }
    }
}

/// A suite holding `ScriptedCase`, its event log, and a count of instances built.
pub struct Scenario {
    pub suite: Suite,
    pub log: EventLog,
    pub instances: Arc<AtomicUsize>,
}

impl Scenario {
    pub fn new(script: Script) -> Self {
        let log = EventLog::default();
        let instances = Arc::new(AtomicUsize::new(0));

        let factory_log = log.clone();
        let factory_instances = instances.clone();
        let suite = Suite::new().add_with(move || {
            factory_instances.fetch_add(1, Ordering::SeqCst);
            ScriptedCase {
                log: factory_log.clone(),
                script,
                touched: false,
                running_body: false,
            }
        });

        Self {
            suite,
            log,
            instances,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn instances(&self) -> usize {
        self.instances.load(Ordering::SeqCst)
    }
}

/// Output of an in-memory run.
pub struct Captured {
    pub summary: RunSummary,
    pub report: String,
}

/// Plans every discovered test of `suite` and runs it with a verbose reporter.
pub fn run_suite(suite: &Suite, options: RunOptions) -> Captured {
    run_suite_with_token(suite, options, CancellationToken::new())
}

pub fn run_suite_with_token(
    suite: &Suite,
    options: RunOptions,
    token: CancellationToken,
) -> Captured {
    let plan = discovery::plan(suite, "test", &[], &[]).expect("plan should succeed");
    let runner = Runner::new(options, token);
    let mut reporter = TextReporter::new(Vec::new(), 2);
    let summary = runner.run(suite, &plan, &mut reporter);
    reporter
        .print_summary(&summary)
        .expect("writing to a Vec cannot fail");
    let report = String::from_utf8(reporter.into_inner()).expect("report is UTF-8");
    Captured { summary, report }
}

/// Buffered output so test bodies do not write to the test binary's stdout.
pub fn buffered() -> RunOptions {
    RunOptions {
        buffer: true,
        ..Default::default()
    }
}

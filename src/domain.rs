//! src/domain.rs
//!
//! The shared data structures of the harness: what a test returns, what the
//! runner records about it, and the summary of a whole run.

use serde::{Deserialize, Serialize};
use std::{any::Any, fmt};

/// What every lifecycle hook and test body returns.
pub type CaseResult = Result<(), Fault>;

/// Why a phase of a test did not complete cleanly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Fault {
    /// An explicit check did not hold.
    Failure(String),
    /// Anything unexpected: a returned error or a non-assertion panic.
    Error(String),
    /// The test asked not to be run to completion.
    Skip(String),
}

impl Fault {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Failure(m) | Self::Error(m) | Self::Skip(m) => m,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }

    /// Classifies a caught panic payload.
    ///
    /// `assert_eq!`, `assert_ne!` and a message-less `assert!` panic with a
    /// message that starts with "assertion"; those become failures. Every
    /// other panic is an error, including `assert!(cond, "custom message")`,
    /// which panics with the custom message alone.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = Self::panic_message(&*payload);
        if message.starts_with("assertion") {
            Self::Failure(message)
        } else {
            Self::Error(format!("panicked: {message}"))
        }
    }

    /// The text a panic was raised with.
    pub fn panic_message(payload: &(dyn Any + Send)) -> String {
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panicked with a non-string payload".to_string()
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure(m) => write!(f, "failure: {m}"),
            Self::Error(m) => write!(f, "error: {m}"),
            Self::Skip(m) => write!(f, "skipped: {m}"),
        }
    }
}

impl From<std::io::Error> for Fault {
    fn from(e: std::io::Error) -> Self {
        Self::Error(e.to_string())
    }
}

/// Fails the test with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(Fault::failure(message))
    }
}

/// Fails the test unless `left == right`.
pub fn ensure_eq<T: PartialEq + fmt::Debug>(left: T, right: T) -> CaseResult {
    if left == right {
        Ok(())
    } else {
        Err(Fault::Failure(format!("{left:?} != {right:?}")))
    }
}

/// The lifecycle step a fault came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Instantiate,
    SetUp,
    Call,
    TearDown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Instantiate => "instantiate",
            Self::SetUp => "set_up",
            Self::Call => "call",
            Self::TearDown => "tear_down",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasedFault {
    pub phase: Phase,
    pub fault: Fault,
}

/// Identifies one test method of one case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestId {
    pub case: String,
    pub method: String,
}

impl TestId {
    pub fn new(case: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            method: method.into(),
        }
    }

    /// `Case.method`, the name `-k` patterns are matched against.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.case, self.method)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}.{})", self.method, self.case, self.method)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Errored,
    Skipped,
}

impl Outcome {
    /// An error anywhere wins over a failure, which wins over a skip.
    pub fn from_faults(faults: &[PhasedFault]) -> Self {
        if faults.iter().any(|f| f.fault.is_error()) {
            Self::Errored
        } else if faults.iter().any(|f| f.fault.is_failure()) {
            Self::Failed
        } else if faults.iter().any(|f| f.fault.is_skip()) {
            Self::Skipped
        } else {
            Self::Passed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "ok",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
            Self::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// Everything the runner learned about one test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: TestId,
    pub outcome: Outcome,
    pub faults: Vec<PhasedFault>,
    /// Present only when output buffering was on.
    pub captured_output: Option<String>,
    pub duration_secs: f64,
}

impl TestRecord {
    pub fn new(
        id: TestId,
        faults: Vec<PhasedFault>,
        captured_output: Option<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            outcome: Outcome::from_faults(&faults),
            id,
            faults,
            captured_output,
            duration_secs,
        }
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.faults
            .iter()
            .find(|f| f.fault.is_skip())
            .map(|f| f.fault.message())
    }

    /// True if this test recorded at least one failure or error.
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self.outcome, Outcome::Failed | Outcome::Errored)
    }
}

/// The aggregated result of a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub records: Vec<TestRecord>,
    pub duration_secs: f64,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn tests_run(&self) -> usize {
        self.records.len()
    }

    /// Counts faults, so a test can contribute both a failure and an error.
    pub fn failures(&self) -> usize {
        self.count_faults(Fault::is_failure)
    }

    pub fn errors(&self) -> usize {
        self.count_faults(Fault::is_error)
    }

    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == Outcome::Skipped)
            .count()
    }

    pub fn was_successful(&self) -> bool {
        self.failures() == 0 && self.errors() == 0
    }

    /// 0 on success, 1 if anything failed or errored, 5 if no test ran.
    pub fn exit_code(&self) -> u8 {
        if !self.was_successful() {
            1
        } else if self.tests_run() == 0 {
            5
        } else {
            0
        }
    }

    fn count_faults(&self, predicate: fn(&Fault) -> bool) -> usize {
        self.records
            .iter()
            .flat_map(|r| r.faults.iter())
            .filter(|f| predicate(&f.fault))
            .count()
    }
}

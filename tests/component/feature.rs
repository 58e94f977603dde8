//! tests/component/feature.rs
//!
//! The built-in feature suite, run the way the binary runs it.

use crate::common::harness;
use test_log::test;
use unit_harness::{
    features::{self, FeatureOneCase, FEATURE_ONE_OUTPUT},
    CaseResult, Context, Fault, Outcome, Suite, TestCase, TestMethod,
};

#[test]
fn default_suite_runs_exactly_one_passing_test() {
    let run = harness::run_suite(&features::suite(), harness::buffered());

    assert_eq!(run.summary.tests_run(), 1);
    let record = &run.summary.records[0];
    assert_eq!(record.id.case, FeatureOneCase::NAME);
    assert_eq!(record.id.method, "test_feature_one");
    assert_eq!(record.outcome, Outcome::Passed);
    assert_eq!(run.summary.failures(), 0);
    assert_eq!(run.summary.errors(), 0);
    assert_eq!(run.summary.exit_code(), 0);
    assert!(run.report.contains("\nRan 1 test in "));
    assert!(run.report.ends_with("\nOK\n"));
}

#[test]
fn captured_output_is_the_feature_line() {
    let run = harness::run_suite(&features::suite(), harness::buffered());
    let expected = format!("{FEATURE_ONE_OUTPUT}\n");
    assert_eq!(run.summary.records[0].captured_output.as_deref(), Some(expected.as_str()));
    assert_eq!(expected, "hello world testing feature one\n");
}

#[test]
fn repeated_runs_give_the_same_result() {
    let first = harness::run_suite(&features::suite(), harness::buffered()).summary;
    for _ in 0..3 {
        let again = harness::run_suite(&features::suite(), harness::buffered()).summary;
        assert_eq!(again.tests_run(), 1);
        assert_eq!(again.records[0].outcome, first.records[0].outcome);
        assert_eq!(again.records[0].captured_output, first.records[0].captured_output);
    }
}

/// The feature case with its print replaced by a raised error.
#[derive(Default)]
struct BrokenFeatureCase;

impl BrokenFeatureCase {
    fn test_feature_one(&mut self, _ctx: &mut Context) -> CaseResult {
        Err(Fault::error("feature one is broken"))
    }
}

impl TestCase for BrokenFeatureCase {
    const NAME: &'static str = "BrokenFeatureCase";

    fn methods() -> Vec<TestMethod<Self>> {
        vec![TestMethod::new("test_feature_one", Self::test_feature_one)]
    }
}

#[test]
fn raised_error_is_one_error_and_a_nonzero_exit() {
    let suite = Suite::new().add::<BrokenFeatureCase>();
    let run = harness::run_suite(&suite, harness::buffered());

    assert_eq!(run.summary.tests_run(), 1);
    assert_eq!(run.summary.errors(), 1);
    assert_eq!(run.summary.failures(), 0);
    assert_ne!(run.summary.exit_code(), 0);
    assert!(run
        .report
        .contains("ERROR: test_feature_one (BrokenFeatureCase.test_feature_one)\n"));
    assert!(run.report.ends_with("FAILED (errors=1)\n"));
}

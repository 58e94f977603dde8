//! src/features.rs
//!
//! The test cases this binary ships with.

use crate::{
    case::{Context, Suite, TestCase, TestMethod},
    domain::CaseResult,
};

pub const FEATURE_ONE_OUTPUT: &str = "hello world testing feature one";

/// Covers feature one. `set_up` and `tear_down` are the trait's no-ops.
#[derive(Debug, Default)]
pub struct FeatureOneCase;

impl FeatureOneCase {
    /// Test feature one.
    fn test_feature_one(&mut self, ctx: &mut Context) -> CaseResult {
        ctx.println(FEATURE_ONE_OUTPUT)
    }
}

impl TestCase for FeatureOneCase {
    const NAME: &'static str = "FeatureOneCase";

    fn methods() -> Vec<TestMethod<Self>> {
        vec![TestMethod::new("test_feature_one", Self::test_feature_one)]
    }
}

/// Every case the binary runs when given no selection.
pub fn suite() -> Suite {
    Suite::new().add::<FeatureOneCase>()
}

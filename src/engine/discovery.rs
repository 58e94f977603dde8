//! src/engine/discovery.rs
//!
//! Turns a `Suite` plus the user's selection into the ordered list of tests
//! to run. Kept apart from the runner so the selection rules can be tested
//! without executing anything.

use crate::{
    case::{RegisteredCase, Suite},
    domain::TestId,
    error::{Error, Result},
};
use glob::Pattern;

/// Plans a run.
///
/// # Arguments
/// * `suite` - The registered cases.
/// * `method_prefix` - Only methods starting with this are discovered.
/// * `selection` - `Case` or `Case.method` names; empty means every case.
/// * `patterns` - `-k` patterns; a test is kept if any of them matches.
pub fn plan(
    suite: &Suite,
    method_prefix: &str,
    selection: &[String],
    patterns: &[String],
) -> Result<Vec<TestId>> {
    let patterns = compile_patterns(patterns)?;
    let mut planned = Vec::new();

    if selection.is_empty() {
        for case in suite.cases() {
            planned.extend(discover(case, method_prefix, &patterns));
        }
        return Ok(planned);
    }

    for name in selection {
        match name.split_once('.') {
            Some((case_name, method)) => {
                let case = suite
                    .case(case_name)
                    .filter(|c| c.has_method(method))
                    .ok_or_else(|| Error::UnknownTest(name.clone()))?;
                planned.push(TestId::new(case.name(), method));
            }
            None => {
                let case = suite
                    .case(name)
                    .ok_or_else(|| Error::UnknownTest(name.clone()))?;
                planned.extend(discover(case, method_prefix, &patterns));
            }
        }
    }
    Ok(planned)
}

/// The prefixed methods of one case, sorted by name, filtered by `patterns`.
pub fn discover(case: &dyn RegisteredCase, method_prefix: &str, patterns: &[Pattern]) -> Vec<TestId> {
    let mut names: Vec<_> = case
        .method_names()
        .into_iter()
        .filter(|name| name.starts_with(method_prefix))
        .collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|method| TestId::new(case.name(), method))
        .filter(|id| matches_any(patterns, &id.full_name()))
        .collect()
}

/// A pattern containing `*` is a shell-style glob; anything else matches as
/// a substring.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            let glob = if p.contains('*') {
                p.clone()
            } else {
                format!("*{}*", Pattern::escape(p))
            };
            Ok(Pattern::new(&glob)?)
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], full_name: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.matches(full_name))
}

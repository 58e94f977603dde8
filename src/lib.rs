//! src/lib.rs
//!
//! A small xUnit-style test harness: test cases with `set_up`/`tear_down`
//! hooks, discovery by method-name prefix, sequential execution with
//! per-test error isolation, and a text or JSON report with an exit status.
//!
//! The binary runs the cases in [`features::suite`].

pub mod app;
pub mod case;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod features;
pub mod report;

pub use app::App;
pub use case::{Context, Suite, TestCase, TestMethod};
pub use config::Config;
pub use domain::{ensure, ensure_eq, CaseResult, Fault, Outcome, RunSummary, TestId, TestRecord};
pub use error::{Error, Result};

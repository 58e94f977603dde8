//! src/error.rs
//!
//! Defines the library's `Error` enum using `thiserror`.
//!
//! These are harness errors (bad configuration, unknown test names, I/O while
//! writing reports). Test failures and test errors are not Rust errors: they
//! are recorded as data in the `RunSummary`.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid test name pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("No test case or method named '{0}'")]
    UnknownTest(String),

    #[error("Tokio task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

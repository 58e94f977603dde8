//! src/config.rs
//!
//! Defines the strongly-typed `Config` struct for all runtime parameters,
//! loaded from `harness.toml`, environment variables and command line
//! overrides via `figment`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level struct holding all harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// 0 prints the summary only, 1 one character per test, 2 one line per test.
    pub verbosity: u8,
    /// Stop the run after the first failure or error.
    pub failfast: bool,
    /// On Ctrl+C, finish the current test and report what ran so far.
    pub catch_interrupt: bool,
    /// Buffer test output instead of writing it to stdout.
    pub buffer: bool,
    /// `-k` patterns matched against `Case.method`.
    pub patterns: Vec<String>,
    /// Methods are discovered only if their name starts with this.
    pub method_prefix: String,
    /// Where to write the JSON report, if anywhere.
    pub report_path: Option<PathBuf>,
}

/// Values taken from the command line. Unset fields leave the lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failfast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catch_interrupt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Config {
    /// The layered sources, lowest priority first: defaults, `harness.toml`,
    /// then `HARNESS_*` environment variables.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("harness.toml"))
            .merge(Env::prefixed("HARNESS_"))
    }

    /// Loads configuration from `harness.toml` and environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Like [`Config::load`], with command line overrides merged on top.
    pub fn load_with(overrides: &ConfigOverrides) -> Result<Self, figment::Error> {
        Self::figment()
            .merge(Serialized::defaults(overrides))
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: 1,
            failfast: false,
            catch_interrupt: false,
            buffer: false,
            patterns: Vec::new(),
            method_prefix: "test".to_string(),
            report_path: None,
        }
    }
}

//! src/report/json.rs
//!
//! Machine-readable report: the whole `RunSummary` plus its derived counts.

use crate::{
    domain::{RunSummary, TestRecord},
    error::Result,
};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tests_run: usize,
    pub failures: usize,
    pub errors: usize,
    pub skipped: usize,
    pub successful: bool,
    pub interrupted: bool,
    pub duration_secs: f64,
    pub records: &'a [TestRecord],
}

impl<'a> From<&'a RunSummary> for JsonReport<'a> {
    fn from(summary: &'a RunSummary) -> Self {
        Self {
            tests_run: summary.tests_run(),
            failures: summary.failures(),
            errors: summary.errors(),
            skipped: summary.skipped(),
            successful: summary.was_successful(),
            interrupted: summary.interrupted,
            duration_secs: summary.duration_secs,
            records: &summary.records,
        }
    }
}

/// Writes the report to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &JsonReport::from(summary))?;
    writeln!(writer)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), "Wrote JSON report");
    Ok(())
}

//! src/report/mod.rs
//!
//! Turns test results into the human-readable report (progress while the run
//! is going, then a list of problems and a summary line) and, optionally, a
//! JSON file.

use crate::domain::{Fault, Outcome, RunSummary, TestId, TestRecord};
use std::io::{self, Write};

pub mod json;

const HEAVY_SEPARATOR: &str =
    "======================================================================";
const LIGHT_SEPARATOR: &str =
    "----------------------------------------------------------------------";

/// Receives progress from the runner as each test starts and finishes.
pub trait ResultSink {
    fn start_test(&mut self, id: &TestId);
    fn finish_test(&mut self, record: &TestRecord);
}

/// Writes the classic text report to any `Write`.
pub struct TextReporter<W: Write> {
    out: W,
    verbosity: u8,
    // Progress callbacks cannot fail, so the first write error waits here.
    pending_error: Option<io::Error>,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, verbosity: u8) -> Self {
        Self {
            out,
            verbosity,
            pending_error: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the problem list and summary lines.
    pub fn print_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }

        if self.verbosity > 0 {
            writeln!(self.out)?;
        }
        if summary.interrupted {
            writeln!(self.out, "Interrupted")?;
        }

        self.print_problems(summary, "ERROR", Fault::is_error)?;
        self.print_problems(summary, "FAIL", Fault::is_failure)?;

        let run = summary.tests_run();
        writeln!(self.out, "{LIGHT_SEPARATOR}")?;
        writeln!(
            self.out,
            "Ran {run} test{} in {:.3}s",
            if run == 1 { "" } else { "s" },
            summary.duration_secs
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", status_line(summary))?;
        self.out.flush()
    }

    fn print_problems(
        &mut self,
        summary: &RunSummary,
        label: &str,
        select: fn(&Fault) -> bool,
    ) -> io::Result<()> {
        for record in &summary.records {
            for phased in record.faults.iter().filter(|f| select(&f.fault)) {
                writeln!(self.out, "{HEAVY_SEPARATOR}")?;
                writeln!(self.out, "{label}: {}", record.id)?;
                writeln!(self.out, "{LIGHT_SEPARATOR}")?;
                writeln!(self.out, "[{}] {}", phased.phase, phased.fault.message())?;
                if let Some(output) = record.captured_output.as_deref().filter(|o| !o.is_empty()) {
                    writeln!(self.out)?;
                    writeln!(self.out, "Stdout:")?;
                    write!(self.out, "{output}")?;
                    if !output.ends_with('\n') {
                        writeln!(self.out)?;
                    }
                }
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    fn progress(&mut self, text: &str) {
        if self.pending_error.is_some() {
            return;
        }
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            self.pending_error = Some(e);
        }
    }
}

impl<W: Write> ResultSink for TextReporter<W> {
    fn start_test(&mut self, id: &TestId) {
        if self.verbosity > 1 {
            self.progress(&format!("{id} ... "));
        }
    }

    fn finish_test(&mut self, record: &TestRecord) {
        match self.verbosity {
            0 => {}
            1 => {
                let mark = match record.outcome {
                    Outcome::Passed => ".",
                    Outcome::Failed => "F",
                    Outcome::Errored => "E",
                    Outcome::Skipped => "s",
                };
                self.progress(mark);
            }
            _ => {
                let line = match record.skip_reason() {
                    Some(reason) if record.outcome == Outcome::Skipped => {
                        format!("skipped '{reason}'\n")
                    }
                    _ => format!("{}\n", record.outcome),
                };
                self.progress(&line);
            }
        }
    }
}

/// `OK`, `OK (skipped=1)`, `FAILED (failures=1, errors=2)` or `NO TESTS RAN`.
pub fn status_line(summary: &RunSummary) -> String {
    let skipped = summary.skipped();

    if !summary.was_successful() {
        let counts: Vec<String> = [
            ("failures", summary.failures()),
            ("errors", summary.errors()),
            ("skipped", skipped),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, n)| format!("{label}={n}"))
        .collect();
        return format!("FAILED ({})", counts.join(", "));
    }

    if summary.tests_run() == 0 {
        "NO TESTS RAN".to_string()
    } else if skipped > 0 {
        format!("OK (skipped={skipped})")
    } else {
        "OK".to_string()
    }
}

//! Console reporting for test case runs.
//!
//! Writes through [`termcolor::WriteColor`], so the same code renders colored
//! output to a terminal (a `termcolor::StandardStream`) and plain text into a
//! buffer for tests.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::engine::{CaseReport, TestResult};

/// Aggregate counts over a batch of case reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    /// Cases that never ran because their source failed to resolve.
    pub errored: usize,
}

impl Summary {
    pub fn from_reports(reports: &[CaseReport]) -> Self {
        reports.iter().fold(Summary::default(), |mut acc, report| {
            acc.passed += report.passed();
            acc.failed += report.failed();
            if report.results.is_err() {
                acc.errored += 1;
            }
            acc
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total() as f64) * 100.0
    }
}

/// Writes one line per argument set, failure details, and a summary line.
pub fn write_reports<W: WriteColor>(out: &mut W, reports: &[CaseReport]) -> io::Result<Summary> {
    for report in reports {
        writeln!(out, "{}", report.name)?;
        match &report.results {
            Ok(results) if results.is_empty() => writeln!(out, "  (no argument sets)")?,
            Ok(results) => {
                for result in results {
                    write_result(out, result)?;
                }
            }
            Err(err) => {
                write_tag(out, "ERROR", Color::Red)?;
                writeln!(out, " {}", err)?;
            }
        }
    }

    let summary = Summary::from_reports(reports);
    writeln!(out)?;
    write!(out, "Summary: total {}, ", summary.total())?;
    write_tag(out, "passed", Color::Green)?;
    write!(out, " {}, ", summary.passed)?;
    write_tag(out, "failed", Color::Red)?;
    write!(out, " {}, ", summary.failed)?;
    write_tag(out, "errored", Color::Yellow)?;
    writeln!(out, " {}", summary.errored)?;
    Ok(summary)
}

fn write_result<W: WriteColor>(out: &mut W, result: &TestResult) -> io::Result<()> {
    write!(out, "  ")?;
    if result.is_pass() {
        write_tag(out, "PASS", Color::Green)?;
    } else {
        write_tag(out, "FAIL", Color::Red)?;
    }
    writeln!(out, " [{}] {}", result.index, result.arguments)?;

    let Some(failure) = &result.error else {
        return Ok(());
    };
    writeln!(out, "    Error: {}", failure.message)?;
    if let (Some(expected), Some(actual)) = (&failure.expected, &failure.actual) {
        writeln!(out, "    Diff:")?;
        write_diff(out, expected, actual)?;
    }
    Ok(())
}

/// Line diff between expected and actual renderings.
fn write_diff<W: WriteColor>(out: &mut W, expected: &str, actual: &str) -> io::Result<()> {
    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                out.reset()?;
                writeln!(out, "       {}", text)?;
            }
            Difference::Rem(text) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(out, "     - {}", text)?;
            }
            Difference::Add(text) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "     + {}", text)?;
            }
        }
    }
    out.reset()
}

fn write_tag<W: WriteColor>(out: &mut W, tag: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", tag)?;
    out.reset()
}

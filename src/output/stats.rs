//! Run statistics
//!
//! This module condenses a [`ScrapeReport`] into the numbers shown to the
//! user after a run.

use crate::model::{ScrapeReport, WarningKind};
use crate::state::RunStatus;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Run statistics summary
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub status: RunStatus,

    /// Number of normalized records produced
    pub records: usize,

    pub pages_succeeded: u32,
    pub pages_failed: u32,

    /// Warning counts by kind
    pub warnings_by_kind: BTreeMap<&'static str, usize>,

    pub duration_seconds: f64,
}

impl RunStatistics {
    /// Share of requested pages that were fetched, in percent
    pub fn page_success_rate(&self) -> f64 {
        let total = self.pages_succeeded + self.pages_failed;
        if total == 0 {
            0.0
        } else {
            self.pages_succeeded as f64 / total as f64 * 100.0
        }
    }

    pub fn total_warnings(&self) -> usize {
        self.warnings_by_kind.values().sum()
    }
}

/// Computes statistics for a finished run
pub fn run_statistics(report: &ScrapeReport) -> RunStatistics {
    let mut warnings_by_kind = BTreeMap::new();
    for warning in &report.warnings {
        *warnings_by_kind.entry(warning.kind.as_str()).or_insert(0) += 1;
    }

    RunStatistics {
        status: report.status(),
        records: report.records.len(),
        pages_succeeded: report.pages_succeeded,
        pages_failed: report.pages_failed,
        warnings_by_kind,
        duration_seconds: report.duration_seconds(),
    }
}

/// Writes statistics in a formatted manner
///
/// # Arguments
///
/// * `report` - The finished run
/// * `out` - Destination (the binary uses stderr so stdout stays clean for
///   exported data)
pub fn write_statistics(report: &ScrapeReport, out: &mut dyn Write) -> io::Result<()> {
    let stats = run_statistics(report);

    writeln!(out, "=== Scrape Summary ===")?;
    writeln!(out, "  Site: {} [{}]", report.site, report.filter)?;
    writeln!(out, "  Status: {}", stats.status)?;
    writeln!(out, "  Records: {}", stats.records)?;
    writeln!(
        out,
        "  Pages: {} ok, {} failed ({:.1}% success)",
        stats.pages_succeeded,
        stats.pages_failed,
        stats.page_success_rate()
    )?;
    writeln!(out, "  Duration: {:.2}s", stats.duration_seconds)?;

    if stats.total_warnings() > 0 {
        writeln!(out, "\nWarnings ({}):", stats.total_warnings())?;
        for (kind, count) in &stats.warnings_by_kind {
            writeln!(out, "  {}: {}", kind, count)?;
        }
        for warning in &report.warnings {
            writeln!(out, "  - {}", warning)?;
        }
    }

    Ok(())
}

/// Prints statistics to stderr
pub fn print_statistics(report: &ScrapeReport) {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    if let Err(e) = write_statistics(report, &mut handle) {
        tracing::debug!("Failed to print run summary: {}", e);
    }
}

/// Counts warnings of one kind
pub fn count_warnings(report: &ScrapeReport, kind: WarningKind) -> usize {
    report.warnings.iter().filter(|w| w.kind == kind).count()
}

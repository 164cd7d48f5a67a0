//! Markdown run report
//!
//! This module generates a human-readable markdown report of a run,
//! including page statistics and every warning that was raised.

use crate::model::ScrapeReport;
use crate::output::stats::run_statistics;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report of a run to a file
///
/// # Arguments
///
/// * `report` - The finished run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_summary(report: &ScrapeReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote run summary to {}", output_path.display());
    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_summary(report: &ScrapeReport) -> String {
    let stats = run_statistics(report);
    let mut md = String::new();

    md.push_str("# Scrape Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", report.site));
    md.push_str(&format!("- **Filter**: {}\n", report.filter));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        stats.duration_seconds
    ));
    md.push_str(&format!("- **Status**: {}\n\n", stats.status));

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!("| Records | {} |\n", stats.records));
    md.push_str(&format!("| Pages fetched | {} |\n", stats.pages_succeeded));
    md.push_str(&format!("| Pages failed | {} |\n", stats.pages_failed));
    md.push_str(&format!(
        "| Page success rate | {:.1}% |\n",
        stats.page_success_rate()
    ));
    md.push_str(&format!("| Warnings | {} |\n\n", stats.total_warnings()));

    if !report.warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        md.push_str("| Kind | Page | Message |\n|------|------|---------|\n");
        for warning in &report.warnings {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                warning.kind.as_str(),
                warning
                    .page
                    .map_or_else(|| "-".to_string(), |p| p.to_string()),
                warning.message.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}

//! Output module for exporting records and run summaries
//!
//! This module handles:
//! - Exporting normalized records as JSON or CSV
//! - Writing markdown run reports
//! - Computing and printing run statistics

mod csv_output;
mod json_output;
mod markdown;
pub mod stats;
mod traits;

pub use csv_output::CsvExporter;
pub use json_output::JsonExporter;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, run_statistics, write_statistics, RunStatistics};
pub use traits::{Exporter, OutputError, OutputResult};

use crate::model::NormalizedRecord;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Returns the exporter for this format
    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            Self::Json => Box::new(JsonExporter),
            Self::Csv => Box::new(CsvExporter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(OutputError::Format(format!(
                "unsupported format '{}' (expected json or csv)",
                other
            ))),
        }
    }
}

/// Exports records to a file, or to stdout when no path is given
///
/// # Arguments
///
/// * `records` - Normalized records from one run
/// * `format` - Export format
/// * `path` - Destination file; `None` writes to stdout
pub fn export_records(
    records: &[NormalizedRecord],
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let exporter = format.exporter();

    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            exporter.write_records(records, &mut writer)?;
            writer.flush()?;
            tracing::info!(
                "Exported {} record(s) as {} to {}",
                records.len(),
                format,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            exporter.write_records(records, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}

//! Exporter trait and error types
//!
//! This module defines the trait interface for record exporters and the
//! errors they can report.

use crate::model::NormalizedRecord;
use crate::output::OutputFormat;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record exporters
///
/// An exporter only sees normalized records; warnings and run metadata are
/// reported separately by the summary writers.
pub trait Exporter {
    /// The format this exporter produces
    fn format(&self) -> OutputFormat;

    /// Writes every record to `out`
    ///
    /// # Arguments
    ///
    /// * `records` - Normalized records, all from the same site
    /// * `out` - Destination writer
    fn write_records(&self, records: &[NormalizedRecord], out: &mut dyn Write)
        -> OutputResult<()>;

    /// Renders the records into an in-memory string
    fn render(&self, records: &[NormalizedRecord]) -> OutputResult<String> {
        let mut buffer = Vec::new();
        self.write_records(records, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| OutputError::Format(e.to_string()))
    }
}

//! JSON exporter

use crate::model::NormalizedRecord;
use crate::output::traits::{Exporter, OutputResult};
use crate::output::OutputFormat;
use std::io::Write;

/// Writes records as a pretty-printed JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_records(
        &self,
        records: &[NormalizedRecord],
        out: &mut dyn Write,
    ) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
        Ok(())
    }
}

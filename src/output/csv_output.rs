//! CSV exporter
//!
//! One header row per site followed by one row per record. Quote tags are
//! flattened into a single `", "`-joined cell. An empty record list produces
//! an empty document (no header), since the column set depends on the site.

use crate::model::NormalizedRecord;
use crate::output::traits::{Exporter, OutputResult};
use crate::output::OutputFormat;
use std::io::Write;

const BOOK_HEADER: [&str; 7] = [
    "title",
    "price",
    "price_text",
    "rating",
    "in_stock",
    "url",
    "category",
];
const QUOTE_HEADER: [&str; 4] = ["text", "author", "author_url", "tags"];
const FILM_HEADER: [&str; 5] = ["title", "year", "awards", "nominations", "best_picture"];

fn header(record: &NormalizedRecord) -> &'static [&'static str] {
    match record {
        NormalizedRecord::Book(_) => &BOOK_HEADER,
        NormalizedRecord::Quote(_) => &QUOTE_HEADER,
        NormalizedRecord::OscarFilm(_) => &FILM_HEADER,
    }
}

fn row(record: &NormalizedRecord) -> Vec<String> {
    match record {
        NormalizedRecord::Book(book) => vec![
            book.title.clone(),
            format!("{:.2}", book.price),
            book.price_text.clone(),
            book.rating.map(|r| r.to_string()).unwrap_or_default(),
            book.in_stock.to_string(),
            book.url.clone().unwrap_or_default(),
            book.category.clone(),
        ],
        NormalizedRecord::Quote(quote) => vec![
            quote.text.clone(),
            quote.author.clone(),
            quote.author_url.clone().unwrap_or_default(),
            quote.tags.join(", "),
        ],
        NormalizedRecord::OscarFilm(film) => vec![
            film.title.clone(),
            film.year.to_string(),
            film.awards.to_string(),
            film.nominations.to_string(),
            film.won.to_string(),
        ],
    }
}

/// Writes records as CSV with a per-site header
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_records(
        &self,
        records: &[NormalizedRecord],
        out: &mut dyn Write,
    ) -> OutputResult<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };

        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(header(first))?;
        for record in records {
            writer.write_record(row(record))?;
        }
        writer.flush()?;
        Ok(())
    }
}

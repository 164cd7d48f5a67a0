//! Data model shared by the crawler, the site parsers and the pipeline
//!
//! # Components
//!
//! - `Site`, `ListingFilter`, `MaxPages`, `ScrapeRequest`: what a run asks for
//! - `PageRequest`: one unit of fetch work handed out by the paginator
//! - `RawRecord`: untyped field mapping produced by a page parser
//! - `NormalizedRecord`: typed record produced by the data pipeline
//! - `Warning`, `ScrapeReport`: what a run hands back to its caller

mod record;
mod report;
mod request;

pub use record::{Book, FieldValue, NormalizedRecord, OscarFilm, Quote, RawRecord};
pub use report::{ScrapeReport, Warning, WarningKind};
pub use request::{ListingFilter, MaxPages, PageRequest, ScrapeRequest, Site};

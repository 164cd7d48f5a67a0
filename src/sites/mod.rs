//! Per-site page parsers
//!
//! Each target site has one parser struct implementing [`PageParser`]. The
//! parser knows the site's URL scheme, which markup marks a record
//! boundary, which sub-elements map to which raw field, and how the site
//! signals that another page exists. Parsers are stateless and selected
//! with [`parser_for`].

pub mod books;
pub mod oscars;
pub mod quotes;

use crate::model::{PageRequest, RawRecord, Site};
use scraper::{ElementRef, Selector};
use thiserror::Error;
use url::Url;

pub use books::BooksParser;
pub use oscars::OscarsParser;
pub use quotes::QuotesParser;

/// Record-scoped parse problems
///
/// A parse error never fails the page: the offending entry is dropped and
/// the error is reported as a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Malformed page body: {0}")]
    MalformedBody(String),

    #[error("Entry {index} is not a record: {message}")]
    InvalidEntry { index: usize, message: String },
}

/// Result of parsing one page body
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Records in document order
    pub records: Vec<RawRecord>,
    /// Entries that were skipped
    pub errors: Vec<ParseError>,
}

/// Site-specific knowledge needed to walk and parse one listing
///
/// Parsing is synchronous, deterministic and free of side effects: the same
/// body always yields the same records.
pub trait PageParser: Send + Sync {
    /// The site this parser understands
    fn site(&self) -> Site;

    /// Builds the absolute URL of the requested page
    fn page_url(&self, base: &Url, request: &PageRequest) -> Result<Url, url::ParseError>;

    /// Extracts every record from a page body, reporting skipped entries
    fn parse_page(&self, body: &str) -> ParsedPage;

    /// Returns true if the site indicates that a further page exists
    fn has_more(&self, body: &str, request: &PageRequest) -> bool;

    /// Whether a page without records marks the end of the listing
    ///
    /// True for paged HTML listings. Endpoints that walk a fixed range decide
    /// the end through [`PageParser::has_more`] alone.
    fn ends_on_empty(&self) -> bool {
        true
    }

    /// Adds provenance fields derived from the request (e.g. the category)
    fn annotate(&self, _record: &mut RawRecord, _request: &PageRequest) {}

    /// Extracts every record from a page body
    fn parse(&self, body: &str) -> Vec<RawRecord> {
        self.parse_page(body).records
    }
}

static BOOKS: BooksParser = BooksParser;
static QUOTES: QuotesParser = QuotesParser;
static OSCARS: OscarsParser = OscarsParser;

/// Returns the parser for `site`
pub fn parser_for(site: Site) -> &'static dyn PageParser {
    match site {
        Site::Books => &BOOKS,
        Site::Quotes => &QUOTES,
        Site::Oscars => &OSCARS,
    }
}

/// Returns `base` with a trailing slash so relative joins append to it
pub(crate) fn directory_url(base: &Url) -> Url {
    let mut url = base.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Returns the first descendant of `element` matching `css`
pub(crate) fn select_first<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    element.select(&selector).next()
}

/// Returns all descendants of `element` matching `css`
pub(crate) fn select_all<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Collects the text of an element with whitespace collapsed
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`text_of`], but `None` when the element has no visible text
pub(crate) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(text_of(element)).filter(|text| !text.is_empty())
}

/// Reads an attribute, `None` when missing or blank
pub(crate) fn attr_of(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

//! scrapethissite.com Oscar films parser
//!
//! The listing is served by an AJAX endpoint returning one JSON array per
//! ceremony year (`?ajax=true&year=2015`). Pagination walks the published
//! years in order; a year-filtered run has exactly one page.

use crate::model::{FieldValue, ListingFilter, PageRequest, RawRecord, Site};
use crate::sites::{PageParser, ParseError, ParsedPage};
use crate::{ConfigError, ConfigResult};
use serde_json::Value;
use url::Url;

/// First ceremony year published by the endpoint
pub const FIRST_YEAR: u16 = 2010;

/// Last ceremony year published by the endpoint
pub const LAST_YEAR: u16 = 2015;

/// Checks that a year is served by the endpoint
pub fn check_year(year: i64) -> ConfigResult<u16> {
    if year < i64::from(FIRST_YEAR) || year > i64::from(LAST_YEAR) {
        return Err(ConfigError::InvalidYear {
            got: year,
            min: FIRST_YEAR,
            max: LAST_YEAR,
        });
    }
    Ok(year as u16)
}

/// Ceremony year a page request maps to
fn request_year(request: &PageRequest) -> u16 {
    match request.filter {
        ListingFilter::Year(year) => year,
        _ => FIRST_YEAR.saturating_add(request.page.saturating_sub(1) as u16),
    }
}

/// Converts one JSON field to a raw value, `None` for null and nested objects
fn field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::String(text) => Some(FieldValue::Text(text.clone())),
        Value::Number(number) => number.as_f64().map(FieldValue::Number),
        Value::Bool(flag) => Some(FieldValue::Bool(*flag)),
        Value::Array(items) => Some(FieldValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
        Value::Null | Value::Object(_) => None,
    }
}

/// Parser for the Oscar films endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct OscarsParser;

impl PageParser for OscarsParser {
    fn site(&self) -> Site {
        Site::Oscars
    }

    fn page_url(&self, base: &Url, request: &PageRequest) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("ajax", "true")
            .append_pair("year", &request_year(request).to_string());
        Ok(url)
    }

    fn parse_page(&self, body: &str) -> ParsedPage {
        let entries = match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                return ParsedPage {
                    records: Vec::new(),
                    errors: vec![ParseError::MalformedBody(format!(
                        "expected a JSON array, got {}",
                        json_kind(&other)
                    ))],
                }
            }
            Err(e) => {
                return ParsedPage {
                    records: Vec::new(),
                    errors: vec![ParseError::MalformedBody(e.to_string())],
                }
            }
        };

        let mut parsed = ParsedPage::default();
        for (index, entry) in entries.iter().enumerate() {
            let Value::Object(fields) = entry else {
                parsed.errors.push(ParseError::InvalidEntry {
                    index,
                    message: format!("expected an object, got {}", json_kind(entry)),
                });
                continue;
            };

            let mut record = RawRecord::new();
            for key in ["title", "year", "awards", "nominations", "best_picture"] {
                record.insert_opt(key, fields.get(key).and_then(field_value));
            }
            parsed.records.push(record);
        }

        parsed
    }

    fn has_more(&self, _body: &str, request: &PageRequest) -> bool {
        match request.filter {
            ListingFilter::Year(_) => false,
            _ => request_year(request) < LAST_YEAR,
        }
    }

    fn ends_on_empty(&self) -> bool {
        false
    }

    fn annotate(&self, record: &mut RawRecord, request: &PageRequest) {
        if !record.contains("year") {
            record.insert("year", f64::from(request_year(request)));
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

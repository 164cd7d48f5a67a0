use crate::model::{
    Book, FieldValue, NormalizedRecord, OscarFilm, Quote, RawRecord, Site, WarningKind,
};
use crate::pipeline::PipelineContext;
use crate::sites::oscars::{FIRST_YEAR, LAST_YEAR};
use thiserror::Error;

/// Why a raw record could not be turned into a typed record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

type ValidationResult<T> = std::result::Result<T, ValidationError>;

fn required_text(record: &RawRecord, field: &'static str) -> ValidationResult<String> {
    match record.get(field) {
        None => Err(ValidationError::MissingField(field)),
        Some(FieldValue::Text(text)) if text.trim().is_empty() => {
            Err(ValidationError::MissingField(field))
        }
        Some(FieldValue::Text(text)) => Ok(text.trim().to_string()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "text",
        }),
    }
}

fn optional_text(record: &RawRecord, field: &'static str) -> ValidationResult<Option<String>> {
    match record.get(field) {
        None => Ok(None),
        Some(FieldValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(FieldValue::Text(text)) => Ok(Some(text.trim().to_string())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "text",
        }),
    }
}

fn optional_number(record: &RawRecord, field: &'static str) -> ValidationResult<Option<f64>> {
    match record.get(field) {
        None => Ok(None),
        Some(FieldValue::Number(n)) if n.is_finite() => Ok(Some(*n)),
        Some(FieldValue::Number(n)) => Err(ValidationError::OutOfRange {
            field,
            value: n.to_string(),
        }),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a number",
        }),
    }
}

fn optional_bool(record: &RawRecord, field: &'static str) -> ValidationResult<Option<bool>> {
    match record.get(field) {
        None => Ok(None),
        Some(FieldValue::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

/// Integral value within `[min, max]`
fn integer_in(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> ValidationResult<u32> {
    if value.fract() != 0.0 || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(value as u32)
}

fn normalize_book(record: &RawRecord) -> ValidationResult<Book> {
    let title = required_text(record, "title")?;

    let price = optional_number(record, "price")?.ok_or(ValidationError::MissingField("price"))?;
    if price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            value: price.to_string(),
        });
    }
    let price_text = optional_text(record, "price_text")?.unwrap_or_else(|| format!("{:.2}", price));

    let rating = optional_number(record, "rating")?
        .map(|rating| integer_in("rating", rating, 1.0, 5.0).map(|r| r as u8))
        .transpose()?;

    Ok(Book {
        title,
        price,
        price_text,
        rating,
        in_stock: optional_bool(record, "in_stock")?.unwrap_or(false),
        url: optional_text(record, "url")?,
        category: required_text(record, "category")?,
    })
}

fn normalize_quote(record: &RawRecord) -> ValidationResult<Quote> {
    let tags = match record.get("tags") {
        None => Vec::new(),
        Some(FieldValue::List(items)) => items.clone(),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: "tags",
                expected: "a list",
            })
        }
    };

    Ok(Quote {
        text: required_text(record, "text")?,
        author: required_text(record, "author")?,
        author_url: optional_text(record, "author_url")?,
        tags,
    })
}

fn normalize_film(record: &RawRecord) -> ValidationResult<OscarFilm> {
    let title = required_text(record, "title")?;

    let year = optional_number(record, "year")?.ok_or(ValidationError::MissingField("year"))?;
    let year = integer_in("year", year, f64::from(FIRST_YEAR), f64::from(LAST_YEAR))? as u16;

    let count = |field: &'static str| -> ValidationResult<u32> {
        optional_number(record, field)?
            .map(|n| integer_in(field, n, 0.0, f64::from(u32::MAX)))
            .transpose()
            .map(|n| n.unwrap_or(0))
    };

    Ok(OscarFilm {
        title,
        year,
        awards: count("awards")?,
        nominations: count("nominations")?,
        won: optional_bool(record, "best_picture")?.unwrap_or(false),
    })
}

/// Builds the typed record for `site` from a raw record
///
/// Expects coerced values: numbers as [`FieldValue::Number`], flags as
/// [`FieldValue::Bool`].
pub fn normalize_record(site: Site, record: &RawRecord) -> ValidationResult<NormalizedRecord> {
    match site {
        Site::Books => normalize_book(record).map(NormalizedRecord::Book),
        Site::Quotes => normalize_quote(record).map(NormalizedRecord::Quote),
        Site::Oscars => normalize_film(record).map(NormalizedRecord::OscarFilm),
    }
}

/// Short label for a record in warning messages
fn describe(record: &RawRecord) -> String {
    ["title", "text"]
        .iter()
        .find_map(|key| record.get_text(key))
        .map(|label| {
            let label: String = label.chars().take(60).collect();
            format!(" '{}'", label)
        })
        .unwrap_or_default()
}

/// Validates every record, dropping (with a warning) those that fail
pub fn validate_records(
    records: Vec<RawRecord>,
    context: &mut PipelineContext,
) -> Vec<NormalizedRecord> {
    let site = context.site;
    let mut valid = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match normalize_record(site, record) {
            Ok(normalized) => valid.push(normalized),
            Err(e) => context.warn(
                WarningKind::RecordValidation,
                None,
                format!("Dropped record #{}{}: {}", index + 1, describe(record), e),
            ),
        }
    }

    valid
}

use crate::model::{FieldValue, RawRecord, Site};
use crate::pipeline::PipelineContext;

/// Target shape of a raw field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Trimmed text
    Text,
    /// Plain number ("2015", "6")
    Number,
    /// Price with currency symbol ("£51.77"); the original text is kept
    /// under `price_text`
    Price,
    /// Star rating word ("Three") or digit
    Rating,
    /// Availability sentence ("In stock (22 available)")
    Availability,
    /// "true"/"false", "yes"/"no", 1/0
    Flag,
    /// List of trimmed, non-empty strings
    TextList,
}

fn field_table(site: Site) -> &'static [(&'static str, FieldKind)] {
    match site {
        Site::Books => &[
            ("title", FieldKind::Text),
            ("price", FieldKind::Price),
            ("rating", FieldKind::Rating),
            ("in_stock", FieldKind::Availability),
            ("url", FieldKind::Text),
            ("category", FieldKind::Text),
        ],
        Site::Quotes => &[
            ("text", FieldKind::Text),
            ("author", FieldKind::Text),
            ("author_url", FieldKind::Text),
            ("tags", FieldKind::TextList),
        ],
        Site::Oscars => &[
            ("title", FieldKind::Text),
            ("year", FieldKind::Number),
            ("awards", FieldKind::Number),
            ("nominations", FieldKind::Number),
            ("best_picture", FieldKind::Flag),
        ],
    }
}

/// Coerces raw text fields into numbers and booleans
///
/// Values that cannot be coerced are left untouched so that validation can
/// report them; this stage never drops a record.
pub fn coerce_fields(records: Vec<RawRecord>, context: &mut PipelineContext) -> Vec<RawRecord> {
    let table = field_table(context.site);

    records
        .into_iter()
        .map(|mut record| {
            for (field, kind) in table {
                coerce_field(&mut record, field, *kind);
            }
            record
        })
        .collect()
}

fn coerce_field(record: &mut RawRecord, field: &str, kind: FieldKind) {
    let Some(value) = record.remove(field) else {
        return;
    };

    if kind == FieldKind::Price {
        if let FieldValue::Text(text) = &value {
            let text = text.trim().to_string();
            if let Some(price) = parse_price(&text) {
                record.insert(field, price);
                record.insert("price_text", text);
                return;
            }
        }
    }

    let coerced = match (kind, value) {
        (FieldKind::Text, FieldValue::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                // Blank text is the same as an absent field
                return;
            }
            FieldValue::Text(text.to_string())
        }
        (FieldKind::Number, FieldValue::Text(text)) => match text.trim().parse::<f64>() {
            Ok(number) => FieldValue::Number(number),
            Err(_) => FieldValue::Text(text),
        },
        (FieldKind::Rating, FieldValue::Text(text)) => match parse_rating(&text) {
            Some(rating) => FieldValue::Number(rating),
            None => FieldValue::Text(text),
        },
        (FieldKind::Availability, FieldValue::Text(text)) => {
            FieldValue::Bool(text.to_lowercase().contains("in stock"))
        }
        (FieldKind::Flag, FieldValue::Text(text)) => match parse_flag(&text) {
            Some(flag) => FieldValue::Bool(flag),
            None => FieldValue::Text(text),
        },
        (FieldKind::Flag, FieldValue::Number(n)) if n == 0.0 || n == 1.0 => {
            FieldValue::Bool(n == 1.0)
        }
        (FieldKind::TextList, FieldValue::List(items)) => FieldValue::List(
            items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        ),
        (FieldKind::TextList, FieldValue::Text(text)) => FieldValue::List(
            text.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        ),
        (_, other) => other,
    };

    record.insert(field, coerced);
}

/// Extracts the first decimal number from a price string ("£51.77" -> 51.77)
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    number.trim_end_matches('.').parse().ok()
}

/// Maps a star-rating word or digit to 1-5
pub(crate) fn parse_rating(text: &str) -> Option<f64> {
    let rating = match text.trim().to_lowercase().as_str() {
        "one" | "1" => 1.0,
        "two" | "2" => 2.0,
        "three" | "3" => 3.0,
        "four" | "4" => 4.0,
        "five" | "5" => 5.0,
        _ => return None,
    };
    Some(rating)
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" | "" => Some(false),
        _ => None,
    }
}

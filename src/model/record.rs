use crate::model::Site;
use serde::Serialize;
use std::collections::BTreeMap;

/// A scalar (or list of strings) extracted for one raw field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Untyped field mapping extracted from one listing entry
///
/// Absent optional fields are simply missing from the map; a parser never
/// stores placeholders for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value
    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Sets a field only when a value was extracted
    pub fn insert_opt<V: Into<FieldValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Builder-style variant of [`RawRecord::insert`]
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A book from the books catalogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub title: String,
    /// Price as a number, currency symbol stripped
    pub price: f64,
    /// Price exactly as displayed (e.g. "£51.77")
    pub price_text: String,
    /// Star rating 1-5, when the page shows one
    pub rating: Option<u8>,
    pub in_stock: bool,
    /// Relative URL of the book's detail page
    pub url: Option<String>,
    pub category: String,
}

/// A quote from the quotes listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub author_url: Option<String>,
    pub tags: Vec<String>,
}

/// An Oscar-winning film
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OscarFilm {
    pub title: String,
    /// Ceremony year
    pub year: u16,
    pub awards: u32,
    pub nominations: u32,
    /// Whether the film won Best Picture
    #[serde(rename = "best_picture")]
    pub won: bool,
}

/// A validated, typed record ready for export
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Book(Book),
    Quote(Quote),
    OscarFilm(OscarFilm),
}

impl NormalizedRecord {
    /// Returns the site this record came from
    pub fn site(&self) -> Site {
        match self {
            Self::Book(_) => Site::Books,
            Self::Quote(_) => Site::Quotes,
            Self::OscarFilm(_) => Site::Oscars,
        }
    }

    /// Natural key used for in-run de-duplication
    ///
    /// - Books: title + category
    /// - Quotes: text + author
    /// - Films: title + year
    pub fn natural_key(&self) -> String {
        match self {
            Self::Book(book) => format!("{}\u{1f}{}", book.title, book.category),
            Self::Quote(quote) => format!("{}\u{1f}{}", quote.text, quote.author),
            Self::OscarFilm(film) => format!("{}\u{1f}{}", film.title, film.year),
        }
    }
}

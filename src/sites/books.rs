//! books.toscrape.com catalogue parser
//!
//! Listing pages live under `catalogue/category/...`; the first page of a
//! category is `index.html`, later ones `page-N.html`. Each book is an
//! `article.product_pod`, and the pager shows `li.next a` while more pages
//! exist.

use crate::model::{FieldValue, ListingFilter, PageRequest, RawRecord, Site};
use crate::sites::{
    attr_of, directory_url, non_empty_text, select_first, PageParser, ParsedPage,
};
use crate::{ConfigError, ConfigResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Slug of the "all books" pseudo-category
pub const ALL_BOOKS: &str = "books_1";

/// Category slugs published by the catalogue
const CATEGORIES: &[&str] = &[
    "travel_2",
    "mystery_3",
    "historical-fiction_4",
    "sequential-art_5",
    "classics_6",
    "philosophy_7",
    "romance_8",
    "womens-fiction_9",
    "fiction_10",
    "childrens_11",
    "religion_12",
    "nonfiction_13",
    "music_14",
    "default_15",
    "science-fiction_16",
    "sports-and-games_17",
    "add-a-comment_18",
    "fantasy_19",
    "new-adult_20",
    "young-adult_21",
    "science_22",
    "poetry_23",
    "paranormal_24",
    "art_25",
    "psychology_26",
    "autobiography_27",
    "parenting_28",
    "adult-fiction_29",
    "humor_30",
    "horror_31",
    "history_32",
    "food-and-drink_33",
    "christian-fiction_34",
    "business_35",
    "biography_36",
    "thriller_37",
    "contemporary_38",
    "spirituality_39",
    "academic_40",
    "self-help_41",
    "historical_42",
    "christian_43",
    "suspense_44",
    "short-stories_45",
    "novels_46",
    "health_47",
    "politics_48",
    "cultural_49",
    "erotica_50",
    "crime_51",
];

/// Resolves a user-supplied category to its catalogue slug
///
/// Accepts a full slug (`mystery_3`), a bare name (`mystery`,
/// `Science Fiction`), or `books`/`all` for the whole catalogue. Slugs that
/// look like `name_N` are passed through even when not in the known list,
/// since the catalogue may grow.
pub fn resolve_category(input: &str) -> ConfigResult<String> {
    let normalized = input.trim().to_lowercase().replace(' ', "-");

    if normalized.is_empty() || normalized == "books" || normalized == "all" {
        return Ok(ALL_BOOKS.to_string());
    }

    if is_slug(&normalized) {
        return Ok(normalized);
    }

    CATEGORIES
        .iter()
        .find(|slug| category_name(slug) == normalized)
        .map(|slug| slug.to_string())
        .ok_or_else(|| ConfigError::UnknownCategory(input.trim().to_string()))
}

/// Returns the human-facing name part of a slug (`mystery_3` -> `mystery`)
pub fn category_name(slug: &str) -> &str {
    match slug.rsplit_once('_') {
        Some((name, id)) if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) => name,
        _ => slug,
    }
}

fn is_slug(value: &str) -> bool {
    match value.rsplit_once('_') {
        Some((name, id)) => {
            !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !id.is_empty()
                && id.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Category slug a request targets
fn request_slug(request: &PageRequest) -> &str {
    match &request.filter {
        ListingFilter::Category(slug) => slug,
        _ => ALL_BOOKS,
    }
}

/// Parser for the books catalogue
#[derive(Debug, Clone, Copy, Default)]
pub struct BooksParser;

impl BooksParser {
    /// Extracts one book from its listing element
    ///
    /// Every field is optional at this point; the pipeline decides which
    /// ones are required.
    fn parse_book(article: ElementRef<'_>) -> RawRecord {
        let mut record = RawRecord::new();

        let link = select_first(article, "h3 a");
        let title = link
            .and_then(|a| attr_of(a, "title").or_else(|| non_empty_text(a)))
            .or_else(|| select_first(article, "h1, h2, h3").and_then(non_empty_text));
        record.insert_opt("title", title);
        record.insert_opt("url", link.and_then(|a| attr_of(a, "href")));

        let price = select_first(article, ".price_color").and_then(non_empty_text);
        record.insert_opt("price", price);

        // The rating is encoded as a class name: class="star-rating Three"
        let rating = select_first(article, ".star-rating").and_then(|el| {
            el.value()
                .classes()
                .find(|class| *class != "star-rating")
                .map(str::to_string)
        });
        record.insert_opt("rating", rating);

        let availability = select_first(article, ".availability").and_then(non_empty_text);
        record.insert_opt("in_stock", availability);

        record
    }
}

impl PageParser for BooksParser {
    fn site(&self) -> Site {
        Site::Books
    }

    fn page_url(&self, base: &Url, request: &PageRequest) -> Result<Url, url::ParseError> {
        let slug = request_slug(request);
        let directory = if slug == ALL_BOOKS {
            format!("catalogue/category/{}/", slug)
        } else {
            format!("catalogue/category/books/{}/", slug)
        };
        let file = if request.page <= 1 {
            "index.html".to_string()
        } else {
            format!("page-{}.html", request.page)
        };

        directory_url(base).join(&format!("{}{}", directory, file))
    }

    fn parse_page(&self, body: &str) -> ParsedPage {
        let document = Html::parse_document(body);
        let records = match Selector::parse("article.product_pod, div.product") {
            Ok(selector) => document.select(&selector).map(Self::parse_book).collect(),
            Err(_) => Vec::new(),
        };

        ParsedPage {
            records,
            errors: Vec::new(),
        }
    }

    fn has_more(&self, body: &str, _request: &PageRequest) -> bool {
        let document = Html::parse_document(body);
        select_first(document.root_element(), "li.next a").is_some()
    }

    fn annotate(&self, record: &mut RawRecord, request: &PageRequest) {
        let name = category_name(request_slug(request)).to_string();
        record.insert("category", FieldValue::Text(name));
    }
}

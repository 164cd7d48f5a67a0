//! quotes.toscrape.com listing parser

use crate::model::{ListingFilter, PageRequest, RawRecord, Site};
use crate::sites::{
    attr_of, directory_url, non_empty_text, select_all, select_first, text_of, PageParser,
    ParsedPage,
};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Quotation marks the site wraps around every quote
const QUOTE_MARKS: &[char] = &['\u{201c}', '\u{201d}', '"', '\''];

/// Parser for the quotes listing (optionally narrowed to one tag)
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotesParser;

impl QuotesParser {
    fn parse_quote(block: ElementRef<'_>) -> RawRecord {
        let mut record = RawRecord::new();

        let text = select_first(block, "span.text")
            .map(|el| text_of(el).trim_matches(QUOTE_MARKS).trim().to_string())
            .filter(|text| !text.is_empty());
        record.insert_opt("text", text);

        record.insert_opt(
            "author",
            select_first(block, "small.author").and_then(non_empty_text),
        );
        record.insert_opt(
            "author_url",
            select_first(block, "a[href^='/author/']").and_then(|a| attr_of(a, "href")),
        );

        let tags: Vec<String> = select_all(block, "div.tags a.tag")
            .into_iter()
            .filter_map(non_empty_text)
            .collect();
        record.insert("tags", tags);

        record
    }
}

impl PageParser for QuotesParser {
    fn site(&self) -> Site {
        Site::Quotes
    }

    fn page_url(&self, base: &Url, request: &PageRequest) -> Result<Url, url::ParseError> {
        let mut url = directory_url(base);
        let page = request.page.to_string();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty();
            if let ListingFilter::Tag(tag) = &request.filter {
                segments.push("tag").push(tag);
            }
            segments.push("page").push(&page).push("");
        }
        Ok(url)
    }

    fn parse_page(&self, body: &str) -> ParsedPage {
        let document = Html::parse_document(body);
        let records = match Selector::parse("div.quote") {
            Ok(selector) => document.select(&selector).map(Self::parse_quote).collect(),
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
}

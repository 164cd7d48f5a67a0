use crate::sites::{books, oscars};
use crate::{ConfigError, ConfigResult};
use std::fmt;
use std::str::FromStr;

/// Target site of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    /// books.toscrape.com catalogue pages
    Books,
    /// quotes.toscrape.com listing pages
    Quotes,
    /// scrapethissite.com Oscar films (AJAX JSON endpoint)
    Oscars,
}

impl Site {
    /// Returns the lower-case identifier used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Quotes => "quotes",
            Self::Oscars => "oscars",
        }
    }

    /// Returns all supported sites
    pub fn all() -> [Self; 3] {
        [Self::Books, Self::Quotes, Self::Oscars]
    }

    /// Checks that `filter` makes sense for this site and canonicalizes it
    ///
    /// - Books accept `Category` (a slug such as `mystery_3` or a bare name
    ///   such as `mystery`), which is resolved to its slug.
    /// - Quotes accept `Tag`, which is trimmed and lower-cased.
    /// - Oscars accept `Year` within the published ceremony range.
    ///
    /// Every site accepts `All`.
    pub fn canonical_filter(&self, filter: ListingFilter) -> ConfigResult<ListingFilter> {
        match (self, filter) {
            (_, ListingFilter::All) => Ok(ListingFilter::All),
            (Self::Books, ListingFilter::Category(category)) => {
                books::resolve_category(&category).map(ListingFilter::Category)
            }
            (Self::Quotes, ListingFilter::Tag(tag)) => {
                let tag = tag.trim().to_lowercase();
                if tag.is_empty() {
                    Ok(ListingFilter::All)
                } else {
                    Ok(ListingFilter::Tag(tag))
                }
            }
            (Self::Oscars, ListingFilter::Year(year)) => {
                oscars::check_year(i64::from(year)).map(ListingFilter::Year)
            }
            (site, filter) => Err(ConfigError::Validation(format!(
                "{} filter is not supported by the {} site",
                filter.kind(),
                site
            ))),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "books" => Ok(Self::Books),
            "quotes" => Ok(Self::Quotes),
            "oscars" => Ok(Self::Oscars),
            other => Err(ConfigError::UnknownSite(other.to_string())),
        }
    }
}

/// Category, tag or year restriction applied to a listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingFilter {
    /// Walk the whole listing
    All,
    /// Book category slug (e.g. `mystery_3`)
    Category(String),
    /// Quote tag (e.g. `love`)
    Tag(String),
    /// Ceremony year
    Year(u16),
}

impl ListingFilter {
    fn kind(&self) -> &'static str {
        match self {
            Self::All => "unfiltered",
            Self::Category(_) => "category",
            Self::Tag(_) => "tag",
            Self::Year(_) => "year",
        }
    }
}

impl fmt::Display for ListingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Category(category) => write!(f, "category={}", category),
            Self::Tag(tag) => write!(f, "tag={}", tag),
            Self::Year(year) => write!(f, "year={}", year),
        }
    }
}

/// Upper bound on the number of pages a run may request
///
/// Only values in `1..=50` can be constructed; "unbounded" is expressed as
/// `Option<MaxPages>::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxPages(u32);

impl MaxPages {
    /// Largest page cap a caller may ask for
    pub const LIMIT: u32 = 50;

    /// Creates a page cap, rejecting zero, negative and oversized values
    pub fn new(value: i64) -> ConfigResult<Self> {
        if value < 1 || value > i64::from(Self::LIMIT) {
            return Err(ConfigError::InvalidPageCap {
                got: value,
                max: Self::LIMIT,
            });
        }
        Ok(Self(value as u32))
    }

    /// Returns the cap as a page count
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for MaxPages {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MaxPages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated description of one scraping run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub site: Site,
    pub filter: ListingFilter,
    pub max_pages: Option<MaxPages>,
}

impl ScrapeRequest {
    /// Validates the raw inputs of a run at the boundary
    ///
    /// # Arguments
    ///
    /// * `site` - The target site
    /// * `filter` - Category, tag or year restriction
    /// * `max_pages` - Optional page cap (1-50); `None` walks until the site
    ///   reports no further pages
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeRequest)` - The canonicalized request
    /// * `Err(ConfigError)` - The filter or page cap is invalid
    pub fn new(site: Site, filter: ListingFilter, max_pages: Option<i64>) -> ConfigResult<Self> {
        let filter = site.canonical_filter(filter)?;
        let max_pages = max_pages.map(MaxPages::new).transpose()?;
        Ok(Self {
            site,
            filter,
            max_pages,
        })
    }
}

/// One (site, filter, page number) unit of fetch work
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub site: Site,
    pub filter: ListingFilter,
    /// 1-based page number
    pub page: u32,
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] page {}", self.site, self.filter, self.page)
    }
}

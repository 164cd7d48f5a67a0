use crate::model::Site;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the listing scraper
///
/// Every table is optional in the TOML file; missing values fall back to
/// the defaults documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraping: ScrapingConfig,
    pub sites: SitesConfig,
    pub logging: LoggingConfig,
}

/// Request behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Per-request timeout in seconds (default 30)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Delay between successive requests and between retries, in seconds
    /// (default 1.0)
    #[serde(rename = "request-delay")]
    pub request_delay: f64,

    /// Maximum number of attempts per page (default 3)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Optional HTTP(S) proxy for all requests
    #[serde(rename = "proxy-url")]
    pub proxy_url: Option<String>,
}

impl ScrapingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay.max(0.0))
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            request_timeout: 30,
            request_delay: 1.0,
            max_retries: 3,
            user_agent: format!("listing-scraper/{}", env!("CARGO_PKG_VERSION")),
            proxy_url: None,
        }
    }
}

/// Base URLs of the target sites
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    #[serde(rename = "books-url")]
    pub books_url: String,

    #[serde(rename = "quotes-url")]
    pub quotes_url: String,

    #[serde(rename = "oscars-url")]
    pub oscars_url: String,
}

impl SitesConfig {
    /// Returns the configured base URL for `site`
    pub fn base_url(&self, site: Site) -> &str {
        match site {
            Site::Books => &self.books_url,
            Site::Quotes => &self.quotes_url,
            Site::Oscars => &self.oscars_url,
        }
    }
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            books_url: "https://books.toscrape.com/".to_string(),
            quotes_url: "https://quotes.toscrape.com/".to_string(),
            oscars_url: "https://www.scrapethissite.com/pages/ajax-javascript/".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Force debug-level logging regardless of `log-level`
    pub debug: bool,

    /// Default log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: String,
}

impl LoggingConfig {
    /// Returns the effective level, taking `debug` into account
    pub fn effective_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

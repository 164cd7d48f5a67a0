//! Listing Scraper: a polite paginated-listing harvester
//!
//! This crate walks the paginated listings of a few well-known scraping
//! sandboxes (books, quotes, Oscar films), extracts raw records from every
//! page, and normalizes them through an ordered processing pipeline before
//! handing them to an exporter.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod sites;
pub mod state;

use thiserror::Error;

/// Main error type for listing-scraper operations
///
/// Page-level and record-level problems never surface here; they are
/// collected as [`model::Warning`]s on the run report instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and boundary-validation errors
///
/// These are raised before any request is issued and are fatal only to the
/// single run invocation that triggered them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for environment variable {name}: '{value}'")]
    InvalidEnv { name: String, value: String },

    #[error("Unknown site: '{0}' (expected books, quotes or oscars)")]
    UnknownSite(String),

    #[error("Unknown book category: '{0}'")]
    UnknownCategory(String),

    #[error("Page cap must be between 1 and {max}, got {got}")]
    InvalidPageCap { got: i64, max: u32 },

    #[error("Year {got} is not available (expected {min}-{max})")]
    InvalidYear { got: i64, min: u16, max: u16 },
}

/// Result type alias for listing-scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape, FetchError, FetchErrorKind, Fetcher, Paginator, ScraperOrchestrator};
pub use model::{
    FieldValue, ListingFilter, MaxPages, NormalizedRecord, PageRequest, RawRecord, ScrapeReport,
    ScrapeRequest, Site, Warning, WarningKind,
};
pub use pipeline::{DataPipeline, PipelineContext};
pub use state::{RunPhase, RunStatus};

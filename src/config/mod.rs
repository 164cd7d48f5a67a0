//! Configuration module for the listing scraper
//!
//! Configuration is layered: built-in defaults, an optional TOML file, then
//! `.env` files and the process environment (`REQUEST_TIMEOUT`,
//! `REQUEST_DELAY`, `MAX_RETRIES`, `DEBUG`, `LOG_LEVEL`, `PROXY_URL`). The
//! resulting [`Config`] is passed explicitly to the fetcher and orchestrator.
//!
//! # Example
//!
//! ```no_run
//! use listing_scraper::config::resolve_config;
//!
//! let config = resolve_config(None).unwrap();
//! println!("Requests time out after {}s", config.scraping.request_timeout);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LoggingConfig, ScrapingConfig, SitesConfig};

// Re-export parser functions
pub use parser::{apply_env_overrides, load_config, load_dotenv, resolve_config};
pub use validation::validate;

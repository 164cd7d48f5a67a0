use crate::config::types::{Config, LoggingConfig, ScrapingConfig, SitesConfig};
use crate::model::Site;
use crate::ConfigError;
use url::Url;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraping_config(&config.scraping)?;
    validate_sites_config(&config.sites)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates request behavior configuration
fn validate_scraping_config(config: &ScrapingConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 || config.request_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 300 seconds, got {}",
            config.request_timeout
        )));
    }

    if !config.request_delay.is_finite()
        || config.request_delay < 0.0
        || config.request_delay > 60.0
    {
        return Err(ConfigError::Validation(format!(
            "request_delay must be between 0 and 60 seconds, got {}",
            config.request_delay
        )));
    }

    if config.max_retries < 1 || config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 1 and 10, got {}",
            config.max_retries
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy_url {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy_url '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates that every site base URL is an absolute HTTP(S) URL
fn validate_sites_config(config: &SitesConfig) -> Result<(), ConfigError> {
    for site in Site::all() {
        let raw = config.base_url(site);
        let url = Url::parse(raw).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid {} base URL '{}': {}", site, raw, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "{} base URL '{}' must use http or https",
                site, raw
            )));
        }
    }

    Ok(())
}

/// Validates logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    let level = config.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "log_level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            config.log_level
        )));
    }

    Ok(())
}

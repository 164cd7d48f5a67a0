use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use listing_scraper::config::load_config;
///
/// let config = load_config(Path::new("scraper.toml")).unwrap();
/// println!("Max retries: {}", config.scraping.max_retries);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads `.env.{ENV}` if it exists, otherwise `.env`
///
/// Missing files are not an error; variables already present in the process
/// environment are never overwritten.
pub fn load_dotenv() {
    let env_name = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());
    let specific = format!(".env.{}", env_name);

    match dotenvy::from_filename(&specific) {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(_) => {
            if let Ok(path) = dotenvy::dotenv() {
                tracing::debug!("Loaded environment from {}", path.display());
            }
        }
    }
}

/// Overrides configuration values from environment-style variables
///
/// Recognized names: `REQUEST_TIMEOUT`, `REQUEST_DELAY`, `MAX_RETRIES`,
/// `DEBUG`, `LOG_LEVEL`, `PROXY_URL`. The lookup is injected so callers (and
/// tests) decide where the variables come from.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("REQUEST_TIMEOUT") {
        config.scraping.request_timeout = parse_env("REQUEST_TIMEOUT", &value)?;
    }
    if let Some(value) = lookup("REQUEST_DELAY") {
        config.scraping.request_delay = parse_env("REQUEST_DELAY", &value)?;
    }
    if let Some(value) = lookup("MAX_RETRIES") {
        config.scraping.max_retries = parse_env("MAX_RETRIES", &value)?;
    }
    if let Some(value) = lookup("DEBUG") {
        config.logging.debug = value.trim().eq_ignore_ascii_case("true") || value.trim() == "1";
    }
    if let Some(value) = lookup("LOG_LEVEL") {
        config.logging.log_level = value.trim().to_lowercase();
    }
    if let Some(value) = lookup("PROXY_URL") {
        let value = value.trim();
        config.scraping.proxy_url = (!value.is_empty()).then(|| value.to_string());
    }
    Ok(())
}

/// Builds the effective configuration for a run
///
/// Layers, lowest precedence first: built-in defaults, the optional TOML
/// file, `.env` files, then the process environment.
pub fn resolve_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    load_dotenv();
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;

    Ok(config)
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

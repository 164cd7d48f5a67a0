//! Listing Scraper main entry point
//!
//! This is the command-line interface for the listing scraper.

use clap::Parser;
use listing_scraper::config::{resolve_config, LoggingConfig};
use listing_scraper::output::{
    export_records, generate_markdown_summary, print_statistics, OutputFormat,
};
use listing_scraper::sites::oscars::check_year;
use listing_scraper::{scrape, ConfigError, ListingFilter, RunStatus, ScrapeRequest, Site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing Scraper: a polite paginated-listing harvester
///
/// Walks the listing of one site page by page, normalizes every record and
/// exports the result. Pages that fail are reported as warnings; the run
/// keeps whatever it could collect.
#[derive(Parser, Debug)]
#[command(name = "listing-scraper")]
#[command(version)]
#[command(about = "A polite paginated-listing harvester", long_about = None)]
struct Cli {
    /// Site to scrape (books, quotes, oscars)
    #[arg(value_name = "SITE")]
    site: Site,

    /// Book category, quote tag or ceremony year
    #[arg(value_name = "FILTER")]
    filter: Option<String>,

    /// Ceremony year (oscars only)
    #[arg(long, conflicts_with = "filter")]
    year: Option<i64>,

    /// Maximum number of pages to fetch (1-50); walks the whole listing if omitted
    #[arg(short, long, allow_negative_numbers = true)]
    pages: Option<i64>,

    /// Export format (json, csv)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Write records to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write a markdown run summary to this file
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref())?;

    // Setup logging based on verbosity and configuration
    setup_logging(cli.verbose, cli.quiet, &config.logging);

    let request = build_request(&cli).map_err(|e| {
        tracing::error!("Invalid request: {}", e);
        e
    })?;

    let report = match scrape(&config, &request).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    export_records(&report.records, cli.format, cli.output.as_deref())?;

    if let Some(path) = &cli.summary {
        generate_markdown_summary(&report, path)?;
    }

    if !cli.quiet {
        print_statistics(&report);
    }

    if report.status() == RunStatus::Failed {
        return Err(format!("no page of the {} listing could be fetched", report.site).into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber
///
/// `-q` and `-v` take precedence; otherwise the configured level applies.
/// Logs go to stderr so that stdout stays clean for exported records.
fn setup_logging(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!(
                "listing_scraper={},warn",
                logging.effective_level()
            )),
            1 => EnvFilter::new("listing_scraper=debug,info"),
            2 => EnvFilter::new("listing_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Turns the positional filter into the site's filter kind
fn build_request(cli: &Cli) -> Result<ScrapeRequest, ConfigError> {
    let filter = match (cli.site, &cli.filter, cli.year) {
        (_, None, None) => ListingFilter::All,
        (Site::Oscars, _, Some(year)) => ListingFilter::Year(check_year(year)?),
        (Site::Oscars, Some(value), None) => {
            let year = value.trim().parse::<i64>().map_err(|_| {
                ConfigError::Validation(format!("'{}' is not a ceremony year", value))
            })?;
            ListingFilter::Year(check_year(year)?)
        }
        (site, _, Some(_)) => {
            return Err(ConfigError::Validation(format!(
                "--year only applies to oscars, not {}",
                site
            )))
        }
        (Site::Books, Some(value), None) => ListingFilter::Category(value.clone()),
        (Site::Quotes, Some(value), None) => ListingFilter::Tag(value.clone()),
    };

    ScrapeRequest::new(cli.site, filter, cli.pages)
}

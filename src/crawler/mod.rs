//! Crawler module for paginated listing runs
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry logic and request pacing
//! - Pagination planning
//! - Run orchestration (fetch, parse, accumulate)

mod coordinator;
mod fetcher;
mod paginator;

pub use coordinator::{CrawlOutcome, ScraperOrchestrator};
pub use fetcher::{build_http_client, FetchError, FetchErrorKind, FetchedBody, Fetcher};
pub use paginator::{pages_for, PageSignal, Paginator, UNBOUNDED_PAGE_LIMIT};

use crate::config::Config;
use crate::model::{ScrapeReport, ScrapeRequest};
use crate::pipeline::{DataPipeline, PipelineContext};
use crate::ScrapeError;
use chrono::Utc;

/// Runs a complete scraping operation
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client from the request configuration
/// 2. Walk the listing page by page
/// 3. Run the raw records through the standard pipeline
/// 4. Assemble the report
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `request` - The validated run request
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - The run finished; check [`ScrapeReport::status`]
///   for partial or failed runs
/// * `Err(ScrapeError)` - The run could not be started
///
/// # Example
///
/// ```no_run
/// use listing_scraper::{scrape, Config, ListingFilter, ScrapeRequest, Site};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = ScrapeRequest::new(Site::Books, ListingFilter::Category("mystery".into()), Some(2))?;
/// let report = scrape(&Config::default(), &request).await?;
/// println!("{} records, status {}", report.records.len(), report.status());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(config: &Config, request: &ScrapeRequest) -> Result<ScrapeReport, ScrapeError> {
    let mut orchestrator = ScraperOrchestrator::new(config)?;
    scrape_with(&mut orchestrator, &DataPipeline::standard(), request).await
}

/// Runs a scraping operation with a caller-supplied orchestrator and pipeline
pub async fn scrape_with(
    orchestrator: &mut ScraperOrchestrator,
    pipeline: &DataPipeline,
    request: &ScrapeRequest,
) -> Result<ScrapeReport, ScrapeError> {
    let started_at = Utc::now();
    let outcome = orchestrator.run(request).await?;

    let mut context = PipelineContext::for_request(request);
    context.warnings = outcome.warnings;
    let records = pipeline.process(outcome.records, &mut context);

    Ok(ScrapeReport {
        site: request.site,
        filter: request.filter.clone(),
        records,
        warnings: context.warnings,
        pages_succeeded: outcome.pages_succeeded,
        pages_failed: outcome.pages_failed,
        started_at,
        finished_at: Utc::now(),
    })
}

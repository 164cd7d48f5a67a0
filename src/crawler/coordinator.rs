//! Run orchestration
//!
//! The orchestrator owns the page loop of a single run: it asks the
//! paginator for the next page, fetches it, hands the body to the site
//! parser, and accumulates the raw records in first-seen order. Page-level
//! problems become warnings; the loop itself only fails on programming or
//! configuration errors.

use crate::config::{Config, SitesConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::paginator::{pages_for, PageSignal};
use crate::model::{RawRecord, ScrapeRequest, Warning, WarningKind};
use crate::sites::parser_for;
use crate::state::RunPhase;
use crate::ScrapeError;
use url::Url;

/// Everything the page loop produced, before the pipeline runs
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Raw records in the order they were first encountered
    pub records: Vec<RawRecord>,
    /// Page-fetch and record-parse warnings
    pub warnings: Vec<Warning>,
    pub pages_succeeded: u32,
    pub pages_failed: u32,
}

impl CrawlOutcome {
    fn warn(&mut self, kind: WarningKind, page: u32, message: impl Into<String>) {
        let warning = Warning::new(kind, Some(page), message);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Drives the fetch/parse loop for scraping runs
pub struct ScraperOrchestrator {
    fetcher: Fetcher,
    sites: SitesConfig,
    phase: RunPhase,
}

impl ScraperOrchestrator {
    /// Creates an orchestrator with a fetcher built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(ScraperOrchestrator)` - Ready to run
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(&config.scraping)?;
        Ok(Self::with_fetcher(fetcher, config.sites.clone()))
    }

    /// Creates an orchestrator around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, sites: SitesConfig) -> Self {
        Self {
            fetcher,
            sites,
            phase: RunPhase::Start,
        }
    }

    /// Phase of the current (or last) run
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs the page loop for one request
    ///
    /// Pages are fetched strictly one after another. A page that cannot be
    /// fetched is recorded as a `page_fetch` warning and the paginator decides
    /// whether the run continues. On paged HTML listings a page that parses to
    /// zero records ends the listing.
    pub async fn run(&mut self, request: &ScrapeRequest) -> Result<CrawlOutcome, ScrapeError> {
        self.phase = RunPhase::Start;

        let parser = parser_for(request.site);
        let base = Url::parse(self.sites.base_url(request.site))?;
        let mut paginator = pages_for(request.site, request.filter.clone(), request.max_pages);
        let mut outcome = CrawlOutcome::default();

        tracing::info!(
            "Starting {} run [{}], page cap: {}",
            request.site,
            request.filter,
            request
                .max_pages
                .map_or_else(|| "none".to_string(), |cap| cap.to_string())
        );

        while let Some(page_request) = paginator.next_request() {
            let page = page_request.page;
            self.transition(RunPhase::Fetching(page))?;

            let url = parser.page_url(&base, &page_request)?;
            tracing::debug!("Fetching {}: {}", page_request, url);

            let fetched = match self.fetcher.fetch(url.as_str()).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    self.transition(RunPhase::PageFailed(page))?;
                    outcome.pages_failed += 1;
                    outcome.warn(WarningKind::PageFetch, page, e.to_string());
                    paginator.record(PageSignal::Failed);
                    continue;
                }
            };

            tracing::debug!(
                "Fetched {} (HTTP {}, {} bytes)",
                fetched.final_url,
                fetched.status,
                fetched.body.len()
            );

            self.transition(RunPhase::Parsing(page))?;
            let parsed = parser.parse_page(&fetched.body);
            for error in &parsed.errors {
                outcome.warn(WarningKind::RecordParse, page, error.to_string());
            }

            let signal = if parsed.records.is_empty() && parser.ends_on_empty() {
                tracing::debug!("Page {} has no records, treating it as the last", page);
                PageSignal::Last
            } else if parser.has_more(&fetched.body, &page_request) {
                PageSignal::More
            } else {
                PageSignal::Last
            };

            self.transition(RunPhase::Accumulating(page))?;
            let found = parsed.records.len();
            outcome
                .records
                .extend(parsed.records.into_iter().map(|mut record| {
                    parser.annotate(&mut record, &page_request);
                    record
                }));
            outcome.pages_succeeded += 1;

            tracing::info!(
                "Page {}: {} record(s), {} total",
                page,
                found,
                outcome.records.len()
            );

            paginator.record(signal);
        }

        self.transition(RunPhase::Done)?;

        tracing::info!(
            "Run finished: {} page(s) requested, {} ok, {} failed, {} raw record(s), {} warning(s)",
            paginator.issued(),
            outcome.pages_succeeded,
            outcome.pages_failed,
            outcome.records.len(),
            outcome.warnings.len()
        );

        Ok(outcome)
    }

    /// Moves to `next`, rejecting transitions the run state machine forbids
    fn transition(&mut self, next: RunPhase) -> Result<(), ScrapeError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Run phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

//! Pagination planning
//!
//! The paginator decides which page to request next. It performs no I/O:
//! the orchestrator reports the outcome of every page through
//! [`Paginator::record`], and the paginator turns that into either the next
//! [`PageRequest`] or the end of the run.

use crate::model::{ListingFilter, MaxPages, PageRequest, Site};

/// Most pages an unbounded run will request
pub const UNBOUNDED_PAGE_LIMIT: u32 = 100;

/// What a fetched page told us about the rest of the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSignal {
    /// The page shows a "next page" marker
    More,
    /// The page is the last one (or empty)
    Last,
    /// The page could not be fetched at all
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// The given page may be requested
    Ready(u32),
    /// The given page was handed out; waiting for its outcome
    Awaiting(u32),
    Done,
}

/// Lazy page planner for one run
///
/// # Termination
///
/// | Signal | Bounded (`max_pages` set) | Unbounded |
/// |--------|---------------------------|-----------|
/// | `More` | Next page, unless the cap is reached | Next page, up to [`UNBOUNDED_PAGE_LIMIT`] |
/// | `Last` | Stop | Stop |
/// | `Failed` | Next page, unless the cap is reached | Stop |
///
/// A failed page in a bounded run does not extend pagination: the cap was
/// already decided before the failure. In an unbounded run there is no way
/// to know whether more pages exist, so the failure ends the run.
#[derive(Debug, Clone)]
pub struct Paginator {
    site: Site,
    filter: ListingFilter,
    max_pages: Option<MaxPages>,
    cursor: Cursor,
    issued: u32,
}

/// Creates the paginator for a run
pub fn pages_for(site: Site, filter: ListingFilter, max_pages: Option<MaxPages>) -> Paginator {
    Paginator::new(site, filter, max_pages)
}

impl Paginator {
    pub fn new(site: Site, filter: ListingFilter, max_pages: Option<MaxPages>) -> Self {
        Self {
            site,
            filter,
            max_pages,
            cursor: Cursor::Ready(1),
            issued: 0,
        }
    }

    /// Returns the next page to fetch, or `None` when the run is over
    ///
    /// Calling this again before [`Paginator::record`] returns `None`: the
    /// paginator never guesses past a page whose outcome it has not seen.
    pub fn next_request(&mut self) -> Option<PageRequest> {
        match self.cursor {
            Cursor::Ready(page) => {
                self.cursor = Cursor::Awaiting(page);
                self.issued += 1;
                Some(PageRequest {
                    site: self.site,
                    filter: self.filter.clone(),
                    page,
                })
            }
            Cursor::Awaiting(page) => {
                tracing::debug!(page, "Outcome of page not recorded yet, not advancing");
                None
            }
            Cursor::Done => None,
        }
    }

    /// Records the outcome of the page most recently handed out
    pub fn record(&mut self, signal: PageSignal) {
        let Cursor::Awaiting(page) = self.cursor else {
            tracing::debug!(?signal, "No page awaiting an outcome, ignoring signal");
            return;
        };

        let cap = self.max_pages.map_or(UNBOUNDED_PAGE_LIMIT, MaxPages::get);
        let cap_reached = page >= cap;

        if cap_reached && self.max_pages.is_none() && signal == PageSignal::More {
            tracing::warn!(
                "Listing still shows more pages after {} pages, stopping the unbounded run",
                UNBOUNDED_PAGE_LIMIT
            );
        }

        self.cursor = match (signal, self.max_pages) {
            (_, _) if cap_reached => Cursor::Done,
            (PageSignal::Last, _) => Cursor::Done,
            (PageSignal::Failed, None) => Cursor::Done,
            (PageSignal::More, _) | (PageSignal::Failed, Some(_)) => Cursor::Ready(page + 1),
        };

        if self.cursor == Cursor::Done {
            tracing::debug!(page, ?signal, cap_reached, "Pagination finished");
        }
    }

    /// Number of page requests handed out so far
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Returns true once no further pages will be handed out
    pub fn is_done(&self) -> bool {
        self.cursor == Cursor::Done
    }
}

/// Phase definitions for the per-run scraping state machine
///
/// ```text
/// Start -> Fetching(n) -> Parsing(n) -> Accumulating(n) -> Fetching(n+1) | Done
///                      \-> PageFailed(n) ----------------> Fetching(n+1) | Done
/// ```
use std::fmt;

/// Represents the current phase of a scraping run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Run created, nothing requested yet
    Start,

    /// Fetching the given page
    Fetching(u32),

    /// Parsing the body of the given page
    Parsing(u32),

    /// Records of the given page were appended to the run buffer
    Accumulating(u32),

    /// The given page could not be fetched after all retries
    PageFailed(u32),

    /// No further pages will be requested
    Done,
}

impl RunPhase {
    /// Returns true once the run will not request any more pages
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the page this phase refers to, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Fetching(n) | Self::Parsing(n) | Self::Accumulating(n) | Self::PageFailed(n) => {
                Some(*n)
            }
            Self::Start | Self::Done => None,
        }
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// Page numbers may only grow when a new fetch begins, and every
    /// per-page phase must refer to the page being fetched.
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        match (*self, next) {
            (Self::Start, Self::Fetching(1)) => true,
            (Self::Start, Self::Done) => true,
            (Self::Fetching(a), Self::Parsing(b)) => a == b,
            (Self::Fetching(a), Self::PageFailed(b)) => a == b,
            (Self::Parsing(a), Self::Accumulating(b)) => a == b,
            (Self::Accumulating(a), Self::Fetching(b)) => b > a,
            (Self::PageFailed(a), Self::Fetching(b)) => b > a,
            (Self::Accumulating(_), Self::Done) => true,
            (Self::PageFailed(_), Self::Done) => true,
            _ => false,
        }
    }

    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Fetching(_) => "fetching",
            Self::Parsing(_) => "parsing",
            Self::Accumulating(_) => "accumulating",
            Self::PageFailed(_) => "page_failed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page() {
            Some(page) => write!(f, "{}({})", self.as_str(), page),
            None => f.write_str(self.as_str()),
        }
    }
}

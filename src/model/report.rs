use crate::model::{ListingFilter, NormalizedRecord, Site};
use crate::state::RunStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// What part of a run a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A page could not be fetched after exhausting retries
    PageFetch,
    /// A listing entry could not be turned into a raw record
    RecordParse,
    /// A raw record failed required-field validation
    RecordValidation,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageFetch => "page_fetch",
            Self::RecordParse => "record_parse",
            Self::RecordValidation => "record_validation",
        }
    }
}

/// Something that was skipped during a run, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// Page the warning is attributed to, when known
    pub page: Option<u32>,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, page: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            kind,
            page,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "[{}] page {}: {}", self.kind.as_str(), page, self.message),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message),
        }
    }
}

/// Final result of one scraping run
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub site: Site,
    pub filter: ListingFilter,
    /// Normalized records in first-seen order
    pub records: Vec<NormalizedRecord>,
    pub warnings: Vec<Warning>,
    pub pages_succeeded: u32,
    pub pages_failed: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    /// Classifies the run for the caller
    ///
    /// A run where no page ever succeeded is `Failed`, even if it has
    /// nothing else to report.
    pub fn status(&self) -> RunStatus {
        RunStatus::classify(self.pages_succeeded, self.warnings.len())
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

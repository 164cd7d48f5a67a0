use serde::Serialize;
use std::fmt;

/// How a finished run turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every planned page succeeded and nothing was skipped
    Complete,

    /// Some pages or records were skipped; see the warnings
    Partial,

    /// Not a single page was fetched successfully
    Failed,
}

impl RunStatus {
    /// Classifies a run from its page tally and warning count
    pub fn classify(pages_succeeded: u32, warnings: usize) -> Self {
        if pages_succeeded == 0 {
            Self::Failed
        } else if warnings > 0 {
            Self::Partial
        } else {
            Self::Complete
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    /// Returns true if at least one page contributed records
    pub fn has_data(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Data pipeline turning raw records into normalized records
//!
//! The pipeline is an explicit, ordered list of plain stage functions:
//!
//! 1. [`coerce_fields`]: text to numbers/booleans, per site field table
//! 2. [`validate_records`]: required fields, type checks; builds the typed
//!    records and drops (with a warning) everything that does not fit
//! 3. [`filter_by_context`]: category/tag/year match against the run filter
//! 4. [`dedup_by_key`]: first occurrence of each natural key wins
//!
//! Stages never abort the batch: a bad record is dropped on its own and its
//! siblings continue. Output order follows input order.

mod coerce;
mod select;
mod validate;

pub use coerce::coerce_fields;
pub use select::{dedup_by_key, filter_by_context};
pub use validate::{normalize_record, validate_records, ValidationError};

use crate::model::{
    ListingFilter, MaxPages, NormalizedRecord, RawRecord, ScrapeRequest, Site, Warning,
    WarningKind,
};

/// Run-scoped parameters threaded through every stage
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub site: Site,
    pub filter: ListingFilter,
    pub max_pages: Option<MaxPages>,
    /// Warnings accumulated by the stages
    pub warnings: Vec<Warning>,
}

impl PipelineContext {
    pub fn new(site: Site, filter: ListingFilter, max_pages: Option<MaxPages>) -> Self {
        Self {
            site,
            filter,
            max_pages,
            warnings: Vec::new(),
        }
    }

    pub fn for_request(request: &ScrapeRequest) -> Self {
        Self::new(request.site, request.filter.clone(), request.max_pages)
    }

    /// Records a warning and mirrors it to the log
    pub fn warn(&mut self, kind: WarningKind, page: Option<u32>, message: impl Into<String>) {
        let warning = Warning::new(kind, page, message);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// A stage over raw records
pub type RawStage = fn(Vec<RawRecord>, &mut PipelineContext) -> Vec<RawRecord>;

/// The stage that turns raw records into typed records
pub type NormalizeStage = fn(Vec<RawRecord>, &mut PipelineContext) -> Vec<NormalizedRecord>;

/// A stage over normalized records
pub type RecordStage = fn(Vec<NormalizedRecord>, &mut PipelineContext) -> Vec<NormalizedRecord>;

/// Ordered chain of record-transforming stages
#[derive(Clone)]
pub struct DataPipeline {
    raw_stages: Vec<(&'static str, RawStage)>,
    normalize: (&'static str, NormalizeStage),
    record_stages: Vec<(&'static str, RecordStage)>,
}

impl DataPipeline {
    /// Pipeline that only validates: no coercion, filtering or dedup
    pub fn empty() -> Self {
        Self {
            raw_stages: Vec::new(),
            normalize: ("validate_records", validate_records),
            record_stages: Vec::new(),
        }
    }

    /// The canonical coerce → validate → filter → dedup chain
    pub fn standard() -> Self {
        Self::empty()
            .with_raw_stage("coerce_fields", coerce_fields)
            .with_record_stage("filter_by_context", filter_by_context)
            .with_record_stage("dedup_by_key", dedup_by_key)
    }

    /// Appends a stage that runs before validation
    pub fn with_raw_stage(mut self, name: &'static str, stage: RawStage) -> Self {
        self.raw_stages.push((name, stage));
        self
    }

    /// Appends a stage that runs after validation
    pub fn with_record_stage(mut self, name: &'static str, stage: RecordStage) -> Self {
        self.record_stages.push((name, stage));
        self
    }

    /// Names of the stages in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.raw_stages
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once(self.normalize.0))
            .chain(self.record_stages.iter().map(|(name, _)| *name))
            .collect()
    }

    /// Runs every stage in order
    ///
    /// # Arguments
    ///
    /// * `raw` - Raw records in the order they were first encountered
    /// * `context` - Run parameters; receives any warnings
    ///
    /// # Returns
    ///
    /// The normalized records, in input order
    pub fn process(
        &self,
        raw: Vec<RawRecord>,
        context: &mut PipelineContext,
    ) -> Vec<NormalizedRecord> {
        let mut records = raw;
        for (name, stage) in &self.raw_stages {
            let before = records.len();
            records = stage(records, context);
            tracing::debug!(stage = name, before, after = records.len(), "Ran stage");
        }

        let (name, normalize) = self.normalize;
        let before = records.len();
        let mut normalized = normalize(records, context);
        tracing::debug!(stage = name, before, after = normalized.len(), "Ran stage");

        for (name, stage) in &self.record_stages {
            let before = normalized.len();
            normalized = stage(normalized, context);
            tracing::debug!(stage = name, before, after = normalized.len(), "Ran stage");
        }

        normalized
    }
}

impl Default for DataPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

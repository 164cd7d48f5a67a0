use crate::model::{ListingFilter, NormalizedRecord};
use crate::pipeline::PipelineContext;
use crate::sites::books::{category_name, ALL_BOOKS};
use std::collections::HashSet;

/// Whether a record belongs to the listing the run asked for
fn matches_filter(record: &NormalizedRecord, filter: &ListingFilter) -> bool {
    match (filter, record) {
        (ListingFilter::All, _) => true,
        (ListingFilter::Category(slug), NormalizedRecord::Book(book)) => {
            slug == ALL_BOOKS || book.category == category_name(slug)
        }
        (ListingFilter::Tag(tag), NormalizedRecord::Quote(quote)) => {
            quote.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
        }
        (ListingFilter::Year(year), NormalizedRecord::OscarFilm(film)) => film.year == *year,
        // A filter that does not apply to this kind of record
        _ => true,
    }
}

/// Keeps only records matching the run's category/tag/year filter
pub fn filter_by_context(
    records: Vec<NormalizedRecord>,
    context: &mut PipelineContext,
) -> Vec<NormalizedRecord> {
    let before = records.len();
    let kept: Vec<NormalizedRecord> = records
        .into_iter()
        .filter(|record| matches_filter(record, &context.filter))
        .collect();

    if kept.len() < before {
        tracing::debug!(
            "Filtered out {} record(s) not matching {}",
            before - kept.len(),
            context.filter
        );
    }
    kept
}

/// Drops records whose natural key was already seen; first occurrence wins
pub fn dedup_by_key(
    records: Vec<NormalizedRecord>,
    _context: &mut PipelineContext,
) -> Vec<NormalizedRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let before = records.len();
    let unique: Vec<NormalizedRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.natural_key()))
        .collect();

    if unique.len() < before {
        tracing::debug!("Dropped {} duplicate record(s)", before - unique.len());
    }
    unique
}

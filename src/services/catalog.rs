use serde::Serialize;

use crate::{
    db::FilmStore,
    error::AppResult,
    models::Film,
    services::aggregator::AggregatedResult,
};

/// Outcome of persisting one aggregation result
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Stores every aggregated record the catalog does not already know.
///
/// A record is known when a stored title contains its title, ignoring case.
/// Records are processed Popcorn first, so a film listed by both providers is
/// stored once with the Popcorn metadata.
pub async fn persist_results(
    store: &dyn FilmStore,
    result: &AggregatedResult,
) -> AppResult<CatalogSummary> {
    let mut summary = CatalogSummary::default();

    for record in result.records() {
        let title = record.title.trim();
        if title.is_empty() {
            summary.skipped += 1;
            continue;
        }

        if store.find_by_title(title).await?.is_some() {
            summary.skipped += 1;
            continue;
        }

        store.insert(&Film::from_record(record)).await?;
        summary.inserted += 1;
    }

    tracing::debug!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Catalog updated"
    );

    Ok(summary)
}

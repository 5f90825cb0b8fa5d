//! Scrape the newest bulletin.

use crate::pipeline::{Pipeline, RunOutcome};
use crate::source::PageSource;
use dam_core::date::standardize;
use dam_core::extract::extract_latest_link;
use dam_core::{DamError, Snapshot};
use log::{error, info};

/// Fetch the listing page, follow its newest bulletin, merge the bulletin
/// into the stored histories and write them if anything changed.
///
/// A failed fetch, a listing without bulletins, or a bulletin without any
/// tracked dam ends the run before anything is written.
pub async fn run_latest<S: PageSource + Sync>(
    source: &S,
    pipeline: &Pipeline,
    listing_url: &str,
) -> anyhow::Result<RunOutcome> {
    let listing = source.fetch(listing_url).await.map_err(|e| {
        error!("Error fetching the most recent page: {}", e);
        DamError::NoPageFound
    })?;
    let Some(link) = extract_latest_link(&listing) else {
        info!("No recent page found.");
        return Err(DamError::NoPageFound.into());
    };

    info!("Processing page: {} {}", link.date, link.url);
    let page = source.fetch(&link.url).await.map_err(|e| {
        error!("Error fetching bulletin {}: {}", link.url, e);
        DamError::NoPageFound
    })?;
    let records = pipeline.records_from_page(&page, Some(&link.date));
    if records.is_empty() {
        info!("No dam data extracted for {}.", link.date);
        return Err(DamError::NoDataExtracted(link.url).into());
    }

    let last_update = records
        .first()
        .and_then(|r| r.latest_observation())
        .map(|o| o.date.clone())
        .unwrap_or_else(|| standardize(&link.date));

    let store = &pipeline.store;
    let mut histories = store.load_all()?;
    let changed = store.merge(&mut histories, &records);
    let outcome = RunOutcome {
        pages: 1,
        records: records.len(),
        changed,
    };
    if changed {
        store.persist_all(&mut histories, &Snapshot::new(last_update, records))?;
    } else {
        info!("Bulletin {} is already stored, nothing to write", link.date);
    }
    Ok(outcome)
}

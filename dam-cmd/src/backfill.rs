//! Backfill - merge a list of historical bulletins.
//!
//! Pages are processed oldest first so that the attributes left on each dam
//! come from the most recent bulletin.

use crate::pipeline::{Pipeline, RunOutcome};
use crate::source::PageSource;
use anyhow::Context;
use dam_core::extract::PageLink;
use dam_core::{DamError, ObservationDate, Snapshot};
use log::{info, warn};
use std::cmp::Ordering;
use std::path::Path;

/// Read a CSV of `date,url` rows (with a header row).
pub fn read_pages(csv_path: &Path) -> anyhow::Result<Vec<PageLink>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open page list {}", csv_path.display()))?;

    let mut pages = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let date = record.get(0).unwrap_or("").trim();
        let url = record.get(1).unwrap_or("").trim();
        if url.is_empty() {
            warn!("Skipping page list row without a url: {:?}", record);
            continue;
        }
        pages.push(PageLink {
            date: date.to_string(),
            url: url.to_string(),
        });
    }
    Ok(pages)
}

/// Oldest first; pages with unparseable dates keep their order at the end.
pub fn sort_chronologically(pages: &mut [PageLink]) {
    pages.sort_by(|a, b| {
        let a = ObservationDate::parse(&a.date).as_naive_date();
        let b = ObservationDate::parse(&b.date).as_naive_date();
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Fetch and merge every page in date order, then write once if anything
/// changed. Pages without tracked dams are skipped; a failed fetch ends the
/// run with nothing written. The snapshot is the last dated page, or the
/// last page when none of them carry a usable date.
pub async fn run_backfill<S: PageSource + Sync>(
    source: &S,
    pipeline: &Pipeline,
    mut pages: Vec<PageLink>,
) -> anyhow::Result<RunOutcome> {
    sort_chronologically(&mut pages);

    let store = &pipeline.store;
    let mut histories = store.load_all()?;
    let mut outcome = RunOutcome::default();
    let mut newest: Option<Snapshot> = None;
    let mut newest_is_dated = false;

    for page in &pages {
        info!("Processing: {} {}", page.date, page.url);
        let html = source.fetch(&page.url).await?;
        let records = pipeline.records_from_page(&html, Some(&page.date));
        if records.is_empty() {
            warn!("No dam data extracted for {}.", page.date);
            continue;
        }
        outcome.pages += 1;
        outcome.records += records.len();
        outcome.changed |= store.merge(&mut histories, &records);

        let last_update = records[0]
            .latest_observation()
            .map(|o| o.date.clone())
            .unwrap_or_else(|| page.date.clone());
        let dated = ObservationDate::parse(&last_update).as_naive_date().is_some();
        if dated || !newest_is_dated {
            newest = Some(Snapshot::new(last_update, records));
            newest_is_dated |= dated;
        }
    }

    let Some(snapshot) = newest else {
        return Err(DamError::NoDataExtracted(format!("any of {} pages", pages.len())).into());
    };

    if outcome.changed {
        store.persist_all(&mut histories, &snapshot)?;
        info!("All {} pages processed and files updated.", outcome.pages);
    } else {
        info!("All {} pages were already stored, nothing to write", outcome.pages);
    }
    Ok(outcome)
}

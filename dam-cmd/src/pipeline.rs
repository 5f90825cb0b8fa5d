use crate::GlobalArgs;
use anyhow::Context;
use dam_core::extract::{extract_dam_page, ExtractOptions};
use dam_core::layout::ColumnLayout;
use dam_core::reference::ReferenceData;
use dam_core::DamRecord;
use dam_store::{HistoryStore, MergeMode, StoreConfig};
use log::info;

/// Everything a run needs besides the pages themselves.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub store: HistoryStore,
    pub reference: ReferenceData,
    pub layout: ColumnLayout,
    pub options: ExtractOptions,
}

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOutcome {
    /// Pages that yielded at least one tracked dam
    pub pages: usize,
    /// Records extracted across those pages
    pub records: usize,
    /// Whether anything was written
    pub changed: bool,
}

impl Pipeline {
    pub fn from_args(args: &GlobalArgs, merge_mode: MergeMode) -> anyhow::Result<Pipeline> {
        let reference = match &args.reference {
            Some(path) => {
                let csv_data = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read reference data {}", path.display()))?;
                ReferenceData::parse_reference_csv(&csv_data)
                    .with_context(|| format!("Failed to parse reference data {}", path.display()))?
            }
            None => ReferenceData::embedded().context("Failed to parse built-in reference data")?,
        };
        info!("Reference data covers {} source labels", reference.len());
        Ok(Pipeline {
            store: HistoryStore::new(StoreConfig {
                data_dir: args.data_dir.clone(),
                snapshot_path: args.snapshot.clone(),
                merge_mode,
            }),
            reference,
            layout: args.layout,
            options: ExtractOptions {
                unit_suffix: args.unit_suffix,
            },
        })
    }

    /// Tracked dams on a bulletin page, each with one observation.
    pub fn records_from_page(&self, page_html: &str, fallback_date: Option<&str>) -> Vec<DamRecord> {
        let page = extract_dam_page(page_html, self.layout);
        let rows = page.rows.len();
        let records = page.into_dam_records(&self.reference, self.options, fallback_date);
        info!("Extracted {} of {} table rows", records.len(), rows);
        records
    }
}

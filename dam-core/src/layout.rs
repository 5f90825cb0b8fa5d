//! Column positions of the bulletin table.
//!
//! The source site has rearranged the table more than once, so the mapping
//! from cell index to field is chosen at run time rather than fixed.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Known bulletin table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum ColumnLayout {
    /// Current layout, with a rule-curve level column
    #[default]
    Kseb2025,
    /// Earlier layout without the rule-curve level column
    Kseb2024,
}

/// Cell index of each field; `None` when the layout has no such column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub id: usize,
    pub name: usize,
    pub mwl: usize,
    pub frl: usize,
    pub live_storage_at_frl: usize,
    pub rule_level: Option<usize>,
    pub blue_level: usize,
    pub orange_level: usize,
    pub red_level: usize,
    pub water_level: usize,
    pub live_storage: usize,
    pub storage_percentage: usize,
    pub inflow: usize,
    pub power_house_discharge: usize,
    pub spillway_release: usize,
    pub total_outflow: usize,
    pub rainfall: usize,
}

const KSEB_2025: Columns = Columns {
    id: 0,
    name: 1,
    mwl: 3,
    frl: 4,
    live_storage_at_frl: 6,
    rule_level: Some(7),
    blue_level: 8,
    orange_level: 9,
    red_level: 10,
    water_level: 11,
    live_storage: 12,
    storage_percentage: 13,
    inflow: 16,
    power_house_discharge: 17,
    spillway_release: 18,
    total_outflow: 19,
    rainfall: 20,
};

const KSEB_2024: Columns = Columns {
    id: 0,
    name: 1,
    mwl: 3,
    frl: 4,
    live_storage_at_frl: 6,
    rule_level: None,
    blue_level: 7,
    orange_level: 8,
    red_level: 9,
    water_level: 10,
    live_storage: 11,
    storage_percentage: 12,
    inflow: 15,
    power_house_discharge: 16,
    spillway_release: 17,
    total_outflow: 18,
    rainfall: 19,
};

/// One data row of the bulletin table, cells already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    pub mwl: String,
    pub frl: String,
    pub live_storage_at_frl: String,
    pub rule_level: String,
    pub blue_level: String,
    pub orange_level: String,
    pub red_level: String,
    pub water_level: String,
    pub live_storage: String,
    pub storage_percentage: String,
    pub inflow: String,
    pub power_house_discharge: String,
    pub spillway_release: String,
    pub total_outflow: String,
    pub rainfall: String,
}

impl ColumnLayout {
    pub fn columns(&self) -> &'static Columns {
        match self {
            ColumnLayout::Kseb2025 => &KSEB_2025,
            ColumnLayout::Kseb2024 => &KSEB_2024,
        }
    }

    /// Table rows before the first data row.
    pub fn header_rows(&self) -> usize {
        2
    }

    /// A data row must have strictly more cells than this.
    pub fn min_cells_exclusive(&self) -> usize {
        match self {
            ColumnLayout::Kseb2025 => 21,
            ColumnLayout::Kseb2024 => 20,
        }
    }

    /// Map the cells of one table row onto named fields. Rows with too few
    /// cells (totals, notes, spacer rows) give `None`.
    pub fn apply(&self, cells: &[String]) -> Option<RawRecord> {
        if cells.len() <= self.min_cells_exclusive() {
            return None;
        }
        let c = self.columns();
        let cell = |i: usize| cells.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        Some(RawRecord {
            id: cell(c.id),
            name: cell(c.name),
            mwl: cell(c.mwl),
            frl: cell(c.frl),
            live_storage_at_frl: cell(c.live_storage_at_frl),
            rule_level: c.rule_level.map(cell).unwrap_or_default(),
            blue_level: cell(c.blue_level),
            orange_level: cell(c.orange_level),
            red_level: cell(c.red_level),
            water_level: cell(c.water_level),
            live_storage: cell(c.live_storage),
            storage_percentage: cell(c.storage_percentage),
            inflow: cell(c.inflow),
            power_house_discharge: cell(c.power_house_discharge),
            spillway_release: cell(c.spillway_release),
            total_outflow: cell(c.total_outflow),
            rainfall: cell(c.rainfall),
        })
    }
}

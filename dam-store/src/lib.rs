//! History store for dam bulletins.
//!
//! Each tracked dam has one JSON file holding its full observation history,
//! named after the dam's canonical name. A separate snapshot file holds only
//! the most recently fetched bulletin. The store is the only writer of both.

use dam_core::DamRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod load;
pub mod merge;
pub mod persist;

pub use merge::merge;

/// Directory holding one history file per dam.
pub const DEFAULT_DATA_DIR: &str = "historic_data";

/// Snapshot of the latest bulletin.
pub const DEFAULT_SNAPSHOT_PATH: &str = "latest_dam_data.json";

/// Extension of every history file.
pub const FILE_EXTENSION: &str = "json";

/// Prefix used for history files by older revisions of the scraper.
const LEGACY_FILE_PREFIX: &str = "historic_data_";

/// Histories keyed by canonical dam name.
pub type Histories = BTreeMap<String, DamRecord>;

/// Whether a re-scrape may replace stored coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Coordinates follow the latest scrape like every other attribute
    Overwrite,
    /// Coordinates already on disk are kept
    #[default]
    PreserveGeolocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub merge_mode: MergeMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            merge_mode: MergeMode::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    config: StoreConfig,
}

impl HistoryStore {
    pub fn new(config: StoreConfig) -> Self {
        HistoryStore { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Path of the history file for a canonical dam name.
    pub fn history_path(&self, name: &str) -> PathBuf {
        self.config.data_dir.join(file_name_for(name))
    }

    /// Path an older revision of the scraper used for the same dam.
    pub fn legacy_history_path(&self, name: &str) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}{}", LEGACY_FILE_PREFIX, file_name_for(name)))
    }
}

/// Key a dam is stored under: underscores read as spaces and whitespace
/// runs collapse to one space. Two names with the same key share a file.
pub fn history_key(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// History file name: whitespace runs become underscores.
pub fn file_name_for(name: &str) -> String {
    format!(
        "{}.{}",
        name.split_whitespace().collect::<Vec<_>>().join("_"),
        FILE_EXTENSION
    )
}

/// Recover the history key from a history file stem.
pub fn name_from_file_stem(stem: &str) -> String {
    history_key(stem.strip_prefix(LEGACY_FILE_PREFIX).unwrap_or(stem))
}

/// Whether a file stem carries the older revision's prefix.
pub fn is_legacy_stem(stem: &str) -> bool {
    stem.starts_with(LEGACY_FILE_PREFIX)
}

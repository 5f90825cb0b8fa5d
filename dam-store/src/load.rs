use crate::merge::insert_observation;
use crate::{is_legacy_stem, name_from_file_stem, Histories, HistoryStore, FILE_EXTENSION};
use dam_core::{DamRecord, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::path::Path;

impl HistoryStore {
    /// Load every history file in the data directory, keyed by the name
    /// recovered from each file name. A file that cannot be read or parsed
    /// is logged and skipped. A missing directory is created and yields no
    /// histories.
    ///
    /// Current file names are read before legacy `historic_data_` ones. When
    /// two files map to the same dam, the first one read keeps its
    /// attributes and only the days it lacks are taken from the other.
    pub fn load_all(&self) -> Result<Histories> {
        let dir = self.data_dir();
        let mut histories = Histories::new();

        if !dir.exists() {
            fs::create_dir_all(dir)?;
            info!("Created {}", dir.display());
            return Ok(histories);
        }

        let mut paths = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_history_extension(path))
            .filter_map(|path| {
                let stem = path.file_stem().and_then(|s| s.to_str())?.to_string();
                Some((is_legacy_stem(&stem), stem, path))
            })
            .collect::<Vec<_>>();
        paths.sort();

        for (_, stem, path) in paths {
            let name = name_from_file_stem(&stem);
            match read_history(&path) {
                Ok(record) => match histories.get_mut(&name) {
                    None => {
                        debug!("Loaded {} observations for {}", record.data.len(), name);
                        histories.insert(name, record);
                    }
                    Some(history) => {
                        let mut added = 0;
                        for observation in &record.data {
                            if insert_observation(&mut history.data, observation) {
                                added += 1;
                            }
                        }
                        warn!(
                            "{} is a second history for {}, took {} missing days from it",
                            path.display(),
                            name,
                            added
                        );
                    }
                },
                Err(e) => {
                    error!("Error reading {}: {}", path.display(), e);
                }
            }
        }

        info!("Loaded {} dam histories from {}", histories.len(), dir.display());
        Ok(histories)
    }
}

fn has_history_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION)
}

fn read_history(path: &Path) -> Result<DamRecord> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

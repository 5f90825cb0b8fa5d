use crate::{Histories, HistoryStore};
use dam_core::observation::sort_descending;
use dam_core::{Result, Snapshot};
use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

impl HistoryStore {
    /// Write every history, re-sorted most recent first, then the snapshot.
    /// Files are overwritten whole. A legacy `historic_data_` file for a dam
    /// is removed once its history has been written under the current name.
    pub fn persist_all(&self, histories: &mut Histories, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        for (name, record) in histories.iter_mut() {
            sort_descending(&mut record.data);
            let path = self.history_path(name);
            write_json(&path, record)?;
            info!("Details for dam {} saved successfully in {}.", name, path.display());

            let legacy = self.legacy_history_path(name);
            if legacy.is_file() {
                fs::remove_file(&legacy)?;
                info!("Removed {}, superseded by {}", legacy.display(), path.display());
            }
        }
        self.write_snapshot(snapshot)
    }

    pub fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let path = &self.config().snapshot_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_json(path, snapshot)?;
        info!(
            "Snapshot for {} ({} dams) saved in {}",
            snapshot.last_update,
            snapshot.dams.len(),
            path.display()
        );
        Ok(())
    }

    /// The last written snapshot, if there is one.
    pub fn read_snapshot(&self) -> Result<Option<Snapshot>> {
        let path = &self.config().snapshot_path;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

/// Pretty JSON with a four space indent and a trailing newline.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, to_json_bytes(value)?)?;
    Ok(())
}

use dam_store::HistoryStore;
use log::info;

/// Print one line per stored dam: newest date, water level, storage and the
/// number of days on record.
pub fn run_status(store: &HistoryStore) -> anyhow::Result<()> {
    let histories = store.load_all()?;
    if histories.is_empty() {
        info!("No histories stored in {}", store.data_dir().display());
        return Ok(());
    }

    println!(
        "{:<20} {:>12} {:>12} {:>10} {:>6}",
        "DAM", "DATE", "LEVEL", "STORAGE %", "DAYS"
    );
    for (name, record) in &histories {
        let (date, level, storage) = record
            .latest_observation()
            .map(|o| (o.date.as_str(), o.water_level.as_str(), o.storage_percentage.as_str()))
            .unwrap_or(("-", "-", "-"));
        println!(
            "{:<20} {:>12} {:>12} {:>10} {:>6}",
            name,
            date,
            level,
            storage,
            record.data.len()
        );
    }

    if let Some(snapshot) = store.read_snapshot()? {
        info!("Last bulletin: {} ({} dams)", snapshot.last_update, snapshot.dams.len());
    }
    Ok(())
}

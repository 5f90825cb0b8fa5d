//! Folding freshly scraped records into stored histories.

use crate::{history_key, Histories, HistoryStore, MergeMode};
use dam_core::{DamRecord, Observation, ObservationDate};
use log::{debug, info, warn};

impl HistoryStore {
    /// [`merge`] using this store's configured merge mode.
    pub fn merge(&self, existing: &mut Histories, fresh: &[DamRecord]) -> bool {
        merge(existing, fresh, self.config().merge_mode)
    }
}

/// Merge fresh records into `existing`, returning whether anything changed.
///
/// A dam seen for the first time is inserted as-is. For a known dam, an
/// observation whose date is already in the history is ignored; otherwise it
/// is inserted in date order and the dam's attributes are replaced by the
/// fresh values.
pub fn merge(existing: &mut Histories, fresh: &[DamRecord], mode: MergeMode) -> bool {
    let mut changed = false;
    for record in fresh {
        if record.data.is_empty() {
            warn!("Fresh record for {} carries no observation, skipping", record.name);
            continue;
        }
        let key = history_key(&record.name);
        match existing.get_mut(&key) {
            None => {
                info!("New dam {} ({} observation)", record.name, record.data.len());
                existing.insert(key, record.clone());
                changed = true;
            }
            Some(history) => {
                let mut inserted = false;
                for observation in &record.data {
                    inserted |= insert_observation(&mut history.data, observation);
                }
                if inserted {
                    history.update_attributes_from(record, mode == MergeMode::PreserveGeolocation);
                    changed = true;
                } else {
                    debug!("{} already has {}", record.name, record.data[0].date);
                }
            }
        }
    }
    changed
}

/// Insert an observation into a most-recent-first history, before the first
/// entry that is strictly earlier. Unparseable dates go to the end. Returns
/// `false` when the history already holds that date.
pub fn insert_observation(history: &mut Vec<Observation>, observation: &Observation) -> bool {
    let date = observation.observation_date();
    if history.iter().any(|o| o.observation_date().same_day(&date)) {
        return false;
    }
    match history
        .iter()
        .position(|o| o.observation_date().is_earlier_than(&date))
    {
        Some(index) => history.insert(index, observation.clone()),
        None => history.push(observation.clone()),
    }
    true
}

/// Whether `history` is strictly descending by date with no repeats.
pub fn is_strictly_descending(history: &[Observation]) -> bool {
    let dates: Vec<ObservationDate> = history.iter().map(|o| o.observation_date()).collect();
    dates.windows(2).all(|pair| pair[1].is_earlier_than(&pair[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(date: &str, level: &str) -> Observation {
        Observation {
            date: date.to_string(),
            water_level: level.to_string(),
            ..Default::default()
        }
    }

    fn dam(name: &str, frl: &str, dates: &[&str]) -> DamRecord {
        DamRecord {
            id: "1".to_string(),
            name: name.to_string(),
            official_name: name.to_uppercase(),
            frl: frl.to_string(),
            latitude: Some(9.84),
            longitude: Some(76.97),
            data: dates.iter().map(|d| observation(d, "2360.00")).collect(),
            ..Default::default()
        }
    }

    fn dates(record: &DamRecord) -> Vec<&str> {
        record.data.iter().map(|o| o.date.as_str()).collect()
    }

    #[test]
    fn test_new_dam_is_created_with_one_observation() {
        let mut histories = Histories::new();
        let changed = merge(&mut histories, &[dam("Idukki", "2403.00", &["16.07.2025"])], MergeMode::Overwrite);
        assert!(changed);
        assert_eq!(histories.len(), 1);
        assert_eq!(histories["Idukki"].data.len(), 1);
    }

    #[test]
    fn test_spacing_variants_share_one_history() {
        let mut histories = Histories::new();
        histories.insert("Lower Periyar".to_string(), dam("Lower Periyar", "253.00", &["14.07.2025"]));
        let changed = merge(
            &mut histories,
            &[dam("Lower  Periyar", "253.00", &["15.07.2025"])],
            MergeMode::Overwrite,
        );
        assert!(changed);
        assert_eq!(histories.len(), 1);
        assert_eq!(dates(&histories["Lower Periyar"]), vec!["15.07.2025", "14.07.2025"]);
    }

    #[test]
    fn test_backfill_inserts_between() {
        let mut histories = Histories::new();
        histories.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["16.07.2025", "14.07.2025"]));
        let changed = merge(&mut histories, &[dam("Idukki", "2403.00", &["15.07.2025"])], MergeMode::Overwrite);
        assert!(changed);
        assert_eq!(dates(&histories["Idukki"]), vec!["16.07.2025", "15.07.2025", "14.07.2025"]);
    }

    #[test]
    fn test_newest_goes_first_and_oldest_last() {
        let mut history = vec![observation("16.07.2025", "a"), observation("14.07.2025", "b")];
        assert!(insert_observation(&mut history, &observation("17.07.2025", "c")));
        assert!(insert_observation(&mut history, &observation("01.07.2025", "d")));
        let got: Vec<&str> = history.iter().map(|o| o.date.as_str()).collect();
        assert_eq!(got, vec!["17.07.2025", "16.07.2025", "14.07.2025", "01.07.2025"]);
        assert!(is_strictly_descending(&history));
    }

    #[test]
    fn test_unparseable_date_is_appended() {
        let mut history = vec![observation("16.07.2025", "a")];
        assert!(insert_observation(&mut history, &observation("sometime", "b")));
        assert_eq!(history[1].date, "sometime");
        assert!(!insert_observation(&mut history, &observation("sometime", "c")));
    }

    #[test]
    fn test_same_date_is_a_no_op() {
        let mut histories = Histories::new();
        histories.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["16.07.2025"]));
        let mut fresh = dam("Idukki", "2404.00", &["16.07.2025"]);
        fresh.data[0].water_level = "9999".to_string();
        let changed = merge(&mut histories, &[fresh], MergeMode::Overwrite);
        assert!(!changed);
        assert_eq!(histories["Idukki"].frl, "2403.00");
        assert_eq!(histories["Idukki"].data[0].water_level, "2360.00");
    }

    #[test]
    fn test_same_day_in_other_format_is_a_no_op() {
        let mut histories = Histories::new();
        histories.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["16-07-2025"]));
        let changed = merge(&mut histories, &[dam("Idukki", "2403.00", &["16.07.2025"])], MergeMode::Overwrite);
        assert!(!changed);
    }

    #[test]
    fn test_attributes_are_last_write_wins() {
        let mut histories = Histories::new();
        histories.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["14.07.2025"]));
        let mut fresh = dam("Idukki", "2403.50", &["15.07.2025"]);
        fresh.id = "9".to_string();
        fresh.official_name = "IDUKKI (CHERUTHONI)".to_string();
        assert!(merge(&mut histories, &[fresh], MergeMode::Overwrite));

        let idukki = &histories["Idukki"];
        assert_eq!(idukki.frl, "2403.50");
        assert_eq!(idukki.id, "9");
        assert_eq!(idukki.official_name, "IDUKKI (CHERUTHONI)");
        assert_eq!(idukki.data[1], observation("14.07.2025", "2360.00"));
    }

    #[test]
    fn test_geolocation_policy() {
        let mut fresh = dam("Idukki", "2403.00", &["15.07.2025"]);
        fresh.latitude = Some(1.0);
        fresh.longitude = None;

        let mut preserved = Histories::new();
        preserved.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["14.07.2025"]));
        merge(&mut preserved, &[fresh.clone()], MergeMode::PreserveGeolocation);
        assert_eq!(preserved["Idukki"].latitude, Some(9.84));
        assert_eq!(preserved["Idukki"].longitude, Some(76.97));

        let mut overwritten = Histories::new();
        overwritten.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["14.07.2025"]));
        merge(&mut overwritten, &[fresh], MergeMode::Overwrite);
        assert_eq!(overwritten["Idukki"].latitude, Some(1.0));
        assert_eq!(overwritten["Idukki"].longitude, None);
    }

    #[test]
    fn test_merging_twice_is_idempotent() {
        let mut histories = Histories::new();
        histories.insert("Idukki".to_string(), dam("Idukki", "2403.00", &["14.07.2025"]));
        let fresh = vec![dam("Idukki", "2403.00", &["15.07.2025"]), dam("Kakki", "981.46", &["15.07.2025"])];
        assert!(merge(&mut histories, &fresh, MergeMode::Overwrite));
        let after_first = histories.clone();
        assert!(!merge(&mut histories, &fresh, MergeMode::Overwrite));
        assert_eq!(histories, after_first);
    }

    #[test]
    fn test_empty_fresh_record_is_ignored() {
        let mut histories = Histories::new();
        assert!(!merge(&mut histories, &[dam("Idukki", "2403.00", &[])], MergeMode::Overwrite));
        assert!(histories.is_empty());
    }

    #[test]
    fn test_order_holds_over_shuffled_merges() {
        let mut histories = Histories::new();
        for day in ["05", "01", "09", "03", "07", "02", "08", "04", "06", "05", "01"] {
            let date = format!("{}.07.2025", day);
            merge(&mut histories, &[dam("Idukki", "2403.00", &[date.as_str()])], MergeMode::Overwrite);
        }
        let idukki = &histories["Idukki"];
        assert_eq!(idukki.data.len(), 9);
        assert!(is_strictly_descending(&idukki.data));
    }
}

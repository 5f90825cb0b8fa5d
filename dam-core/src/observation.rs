use crate::date::ObservationDate;
use serde::{Deserialize, Serialize};

/// One day's readings for a single dam, as published in the bulletin.
///
/// Values are kept as the text the bulletin prints; some carry a unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub date: String,
    #[serde(default)]
    pub water_level: String,
    #[serde(default)]
    pub live_storage: String,
    #[serde(default)]
    pub storage_percentage: String,
    #[serde(default)]
    pub inflow: String,
    #[serde(default)]
    pub power_house_discharge: String,
    #[serde(default)]
    pub spillway_release: String,
    #[serde(default)]
    pub total_outflow: String,
    #[serde(default)]
    pub rainfall: String,
}

impl Observation {
    pub fn observation_date(&self) -> ObservationDate {
        ObservationDate::parse(&self.date)
    }
}

/// Sort observations most recent first. Stable, so observations with
/// unparseable dates keep their relative order at the end.
pub fn sort_descending(observations: &mut [Observation]) {
    observations.sort_by(|a, b| a.observation_date().cmp_descending(&b.observation_date()));
}

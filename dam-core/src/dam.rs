use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// Represents a dam with its static capacity attributes and its observation
/// history, most recent first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamRecord {
    /// Short code assigned by the source site
    #[serde(default)]
    pub id: String,
    /// Canonical display name, the storage key
    pub name: String,
    /// Label printed by the source site
    #[serde(rename = "officialName", default)]
    pub official_name: String,
    /// Maximum water level
    #[serde(rename = "MWL", default)]
    pub mwl: String,
    /// Full reservoir level
    #[serde(rename = "FRL", default)]
    pub frl: String,
    #[serde(rename = "liveStorageAtFRL", default)]
    pub live_storage_at_frl: String,
    #[serde(rename = "ruleLevel", default)]
    pub rule_level: String,
    #[serde(rename = "blueLevel", default)]
    pub blue_level: String,
    #[serde(rename = "orangeLevel", default)]
    pub orange_level: String,
    #[serde(rename = "redLevel", default)]
    pub red_level: String,
    /// Latitude in decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub data: Vec<Observation>,
}

impl DamRecord {
    /// The newest observation, if the history is non-empty.
    pub fn latest_observation(&self) -> Option<&Observation> {
        self.data.first()
    }

    /// Copy every attribute except `name` and `data` from a fresher scrape.
    /// Coordinates are left alone when `keep_geolocation` is set.
    pub fn update_attributes_from(&mut self, fresh: &DamRecord, keep_geolocation: bool) {
        self.id = fresh.id.clone();
        self.official_name = fresh.official_name.clone();
        self.mwl = fresh.mwl.clone();
        self.frl = fresh.frl.clone();
        self.live_storage_at_frl = fresh.live_storage_at_frl.clone();
        self.rule_level = fresh.rule_level.clone();
        self.blue_level = fresh.blue_level.clone();
        self.orange_level = fresh.orange_level.clone();
        self.red_level = fresh.red_level.clone();
        if !keep_geolocation {
            self.latitude = fresh.latitude;
            self.longitude = fresh.longitude;
        }
    }

    /// Level-type attributes, for unit conversion.
    pub fn level_fields_mut(&mut self) -> [&mut String; 6] {
        [
            &mut self.mwl,
            &mut self.frl,
            &mut self.rule_level,
            &mut self.blue_level,
            &mut self.orange_level,
            &mut self.red_level,
        ]
    }
}

use crate::dam::DamRecord;
use serde::{Deserialize, Serialize};

/// The most recently fetched bulletin: each dam carries only the single
/// observation from that bulletin. Rebuilt on every run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
    pub dams: Vec<DamRecord>,
}

impl Snapshot {
    pub fn new(last_update: impl Into<String>, dams: Vec<DamRecord>) -> Self {
        Snapshot {
            last_update: last_update.into(),
            dams,
        }
    }
}

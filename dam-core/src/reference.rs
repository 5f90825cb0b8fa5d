use crate::error::{DamError, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded default reference dataset.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/dams.csv");

/// Unit the source site uses for a dam's level values.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum LevelUnit {
    Meters,
    Feet,
}

/// Static reference data for one dam.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DamReference {
    /// Label as printed by the source site
    pub official_name: String,
    /// Canonical display name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
    pub level_unit: LevelUnit,
}

/// Maps source labels to canonical names and coordinates.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    by_label: HashMap<String, DamReference>,
}

/// Case and whitespace insensitive lookup key for a source label.
fn label_key(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn parse_coordinate(field: Option<&str>, line: u64, what: &str) -> Result<Option<f64>> {
    let raw = field.unwrap_or("").trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| DamError::InvalidReference {
            line,
            reason: format!("{} '{}' is not a number", what, raw),
        })
}

impl ReferenceData {
    /// Reference data from the embedded fixture.
    pub fn embedded() -> Result<ReferenceData> {
        ReferenceData::parse_reference_csv(CSV_OBJECT)
    }

    /// Parse a CSV string of reference rows.
    ///
    /// Expected CSV columns: official_name, name, latitude, longitude, level_unit
    pub fn parse_reference_csv(csv_object: &str) -> Result<ReferenceData> {
        let mut by_label = HashMap::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let line = record.position().map_or(0, |p| p.line());
            let official_name = record.get(0).unwrap_or("").trim().to_string();
            let name = record
                .get(1)
                .unwrap_or("")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if official_name.is_empty() || name.is_empty() {
                return Err(DamError::InvalidReference {
                    line,
                    reason: "official_name and name are required".to_string(),
                });
            }
            // History files use '_' for spaces, so it cannot appear in a name.
            if name.contains('_') {
                return Err(DamError::InvalidReference {
                    line,
                    reason: format!("name '{}' contains '_'", name),
                });
            }
            let latitude = parse_coordinate(record.get(2), line, "latitude")?;
            let longitude = parse_coordinate(record.get(3), line, "longitude")?;
            let level_unit = match record.get(4).unwrap_or("m").trim().to_lowercase().as_str() {
                "" | "m" => LevelUnit::Meters,
                "ft" => LevelUnit::Feet,
                other => {
                    return Err(DamError::InvalidReference {
                        line,
                        reason: format!("unknown level unit '{}'", other),
                    })
                }
            };
            let reference = DamReference {
                official_name,
                name,
                latitude,
                longitude,
                level_unit,
            };
            by_label.insert(label_key(&reference.official_name), reference);
        }
        Ok(ReferenceData { by_label })
    }

    /// Look up a source label. `None` means the dam is not tracked.
    pub fn resolve(&self, label: &str) -> Option<&DamReference> {
        self.by_label.get(&label_key(label))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

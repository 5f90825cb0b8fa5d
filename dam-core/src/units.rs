//! Level unit normalization.
//!
//! A few dams publish levels in feet while the rest of the bulletin is in
//! meters. Those dams are flagged in the reference dataset and their level
//! values are converted before merging.

use crate::dam::DamRecord;
use clap::ValueEnum;

pub const FEET_TO_METERS: f64 = 0.3048;

/// Suffixes that mark a value as being in feet, lowercase.
const FEET_SUFFIXES: [&str; 3] = ["feet", "ft.", "ft"];

/// Whether converted values carry a unit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UnitSuffix {
    /// Bare number, e.g. "731.52"
    #[default]
    #[value(name = "none")]
    Bare,
    /// Number followed by " m", e.g. "731.52 m"
    Meters,
}

/// Convert a feet-suffixed value to meters with two decimals. Anything
/// without a recognised suffix, or whose magnitude does not parse, is
/// returned unchanged, so re-applying never converts twice.
pub fn to_canonical_unit(text: &str, suffix: UnitSuffix) -> String {
    let trimmed = text.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let magnitude = FEET_SUFFIXES
        .iter()
        .find_map(|s| lowered.strip_suffix(s).map(|rest| &trimmed[..rest.len()]));
    let Some(magnitude) = magnitude else {
        return text.to_string();
    };
    match magnitude.trim().replace(',', "").parse::<f64>() {
        Ok(feet) => {
            let meters = feet * FEET_TO_METERS;
            match suffix {
                UnitSuffix::Bare => format!("{:.2}", meters),
                UnitSuffix::Meters => format!("{:.2} m", meters),
            }
        }
        Err(_) => text.to_string(),
    }
}

/// Apply [`to_canonical_unit`] to every level attribute of a dam and to the
/// water level of each of its observations.
pub fn normalize_levels(dam: &mut DamRecord, suffix: UnitSuffix) {
    for field in dam.level_fields_mut() {
        *field = to_canonical_unit(field.as_str(), suffix);
    }
    for observation in dam.data.iter_mut() {
        observation.water_level = to_canonical_unit(&observation.water_level, suffix);
    }
}

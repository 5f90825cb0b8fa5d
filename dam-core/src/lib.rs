pub mod dam;
pub mod date;
pub mod error;
pub mod extract;
#[cfg(feature = "api")]
pub mod fetch;
pub mod html;
pub mod layout;
pub mod observation;
pub mod reference;
pub mod snapshot;
pub mod units;

pub use dam::DamRecord;
pub use date::ObservationDate;
pub use error::{DamError, Result};
pub use observation::Observation;
pub use snapshot::Snapshot;

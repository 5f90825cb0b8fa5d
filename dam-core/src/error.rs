/// Error types for the dam bulletin library
use thiserror::Error;

/// Main error type for bulletin fetching, extraction and storage
#[derive(Error, Debug)]
pub enum DamError {
    /// Every attempt to fetch a page failed
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// No bulletin link was found on the listing page
    #[error("No bulletin page found")]
    NoPageFound,

    /// A bulletin page yielded no usable rows
    #[error("No data extracted from {0}")]
    NoDataExtracted(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to (de)serialize a stored document
    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem read or write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reference dataset row was malformed
    #[error("Invalid reference data at line {line}: {reason}")]
    InvalidReference { line: u64, reason: String },
}

/// Type alias for Results using DamError
pub type Result<T> = std::result::Result<T, DamError>;

//! Boundary errors for caller misuse and table loading.
//!
//! The decoding core itself never errors: extractors are total functions
//! that return `None` for anything they cannot find in the report text.
//! Errors exist only at the input boundary (bad station identifier, empty
//! report, mismatched station pairing) and when loading lookup tables.

use thiserror::Error;

/// Engine boundary errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid station identifier {ident:?}: must be exactly 4 ASCII alphanumeric characters")]
    InvalidStationId { ident: String },

    #[error("empty report text for station {station}")]
    EmptyReport { station: String },

    #[error("station mismatch: METAR is for {metar}, TAF is for {taf}")]
    StationMismatch { metar: String, taf: String },

    #[error("no report supplied for evaluation")]
    NoReports,

    #[error("report kind mismatch: expected {expected}, got {got}")]
    KindMismatch { expected: String, got: String },

    #[error("unsupported table format {extension:?} (expected .toml or .json)")]
    UnsupportedTableFormat { extension: String },

    #[error("failed to parse {format} table: {message}")]
    TableParse { format: &'static str, message: String },
}

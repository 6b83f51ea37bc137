//! Error taxonomy for the aggregation pipeline
//!
//! Everything here is a local, recoverable condition for the caller.
//! Degenerate clusters (single member, zero time span) are not errors;
//! they are explicit variants on the summary rows in [`crate::temporal`].

use thiserror::Error;

/// Errors surfaced by the statistics routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// An aggregation step received zero usable inputs for the
    /// requested operation or filter.
    #[error("no data: {what}")]
    EmptySample { what: &'static str },

    /// A raw input row is missing a required column. Structural schema
    /// violations are fatal for the offending dataset.
    #[error("record is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The operation column held something other than Read or Write.
    #[error("unrecognized operation '{value}' (expected 'Read' or 'Write')")]
    InvalidOperation { value: String },

    /// A run window that ends before it starts.
    #[error("run window ends before it starts: start={start} end={end}")]
    InvalidWindow { start: i64, end: i64 },

    /// CDF binning requested with a non-positive bin width.
    #[error("bin width must be positive, got {0}")]
    InvalidBinWidth(f64),
}

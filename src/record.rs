//! Run records and the input schema boundary
//!
//! One [`RunRecord`] is a single observed execution window of an
//! application performing one kind of I/O, already assigned to a
//! behavioral cluster by the external clustering collaborator.
//!
//! Table loading stays outside this crate. [`RawRecord`] mirrors the
//! tabular column names so a loader can deserialize rows directly and
//! convert them here; conversion reports the offending column on any
//! structural violation.

use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seconds per day, the denominator for run-rate metrics.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// I/O operation kind a run was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// Both operations, in the order reports enumerate them.
    pub const ALL: [Operation; 2] = [Operation::Read, Operation::Write];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "Read"),
            Operation::Write => write!(f, "Write"),
        }
    }
}

impl FromStr for Operation {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Read" => Ok(Operation::Read),
            "Write" => Ok(Operation::Write),
            other => Err(StatsError::InvalidOperation {
                value: other.to_string(),
            }),
        }
    }
}

/// One observed application execution window for one I/O operation
///
/// `start_time <= end_time` holds for every constructed record; the
/// schema boundary rejects inverted windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Application identifier
    pub application: String,
    /// I/O operation this run was clustered under
    pub operation: Operation,
    /// Cluster number assigned by the external clustering collaborator
    pub cluster: u64,
    /// Number of runs the clustering step put in this cluster
    /// (auxiliary; the aggregation recomputes membership itself)
    pub cluster_size: u64,
    /// Window start, seconds
    pub start_time: i64,
    /// Window end, seconds
    pub end_time: i64,
    /// Source log filename (auxiliary)
    pub filename: String,
}

impl RunRecord {
    /// Build a record, enforcing the window invariant.
    pub fn new(
        application: impl Into<String>,
        operation: Operation,
        cluster: u64,
        start_time: i64,
        end_time: i64,
    ) -> Result<Self, StatsError> {
        if end_time < start_time {
            return Err(StatsError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            application: application.into(),
            operation,
            cluster,
            cluster_size: 0,
            start_time,
            end_time,
            filename: String::new(),
        })
    }
}

/// Loosely-typed input row, column names as they appear in the table
///
/// Every field is optional so a partial row deserializes instead of
/// failing inside the loader; the `TryFrom` conversion then names the
/// missing column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Application")]
    pub application: Option<String>,
    #[serde(rename = "Operation")]
    pub operation: Option<String>,
    #[serde(rename = "Cluster Number")]
    pub cluster: Option<u64>,
    #[serde(rename = "Cluster Size")]
    pub cluster_size: Option<u64>,
    #[serde(rename = "Start Time")]
    pub start_time: Option<i64>,
    #[serde(rename = "End Time")]
    pub end_time: Option<i64>,
    #[serde(rename = "Filename")]
    pub filename: Option<String>,
}

impl TryFrom<RawRecord> for RunRecord {
    type Error = StatsError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let application = raw
            .application
            .ok_or(StatsError::MissingField {
                field: "Application",
            })?;
        let operation = raw
            .operation
            .ok_or(StatsError::MissingField { field: "Operation" })?
            .parse::<Operation>()?;
        let cluster = raw.cluster.ok_or(StatsError::MissingField {
            field: "Cluster Number",
        })?;
        let start_time = raw.start_time.ok_or(StatsError::MissingField {
            field: "Start Time",
        })?;
        let end_time = raw
            .end_time
            .ok_or(StatsError::MissingField { field: "End Time" })?;
        if end_time < start_time {
            return Err(StatsError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }

        Ok(RunRecord {
            application,
            operation,
            cluster,
            // Auxiliary columns default rather than fail: the
            // aggregation never reads them.
            cluster_size: raw.cluster_size.unwrap_or(0),
            start_time,
            end_time,
            filename: raw.filename.unwrap_or_default(),
        })
    }
}

/// Convert a batch of raw rows, stopping at the first schema violation.
pub fn convert_rows(rows: Vec<RawRecord>) -> Result<Vec<RunRecord>, StatsError> {
    rows.into_iter().map(RunRecord::try_from).collect()
}

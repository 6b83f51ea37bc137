//! Report assembly for the charting collaborator
//!
//! Bundles the counting, temporal, bucketing, and CDF routines into the
//! two analyses the pipeline runs per operation: cluster
//! characteristics (how clusters distribute over applications and runs
//! over clusters) and temporal trends (lifespans, run rates, and gap
//! variability grouped by lifespan band). Everything serializes with
//! serde so the caller can hand the numbers straight to a plotting
//! layer or notebook.

use crate::cdf::{self, Cdf};
use crate::counts::{self, ApplicationClusters, ClusterRuns};
use crate::error::StatsError;
use crate::range::SpanRange;
use crate::record::{Operation, RunRecord, SECONDS_PER_DAY};
use crate::temporal::{self, ClusterTemporal};
use serde::Serialize;
use tracing::{debug, info};

/// Bin width for the count CDFs (whole clusters / whole runs).
const COUNT_BIN_WIDTH: f64 = 1.0;
/// Bin width for the log-scale temporal CDFs.
const LOG_BIN_WIDTH: f64 = 0.01;

/// How much of the analysis to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    /// Cluster and run counting only
    Counts,
    /// Counting plus the full temporal analysis
    Full,
}

/// Cluster characteristics for one operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationCharacteristics {
    pub operation: Operation,
    pub clusters_per_application: Vec<ApplicationClusters>,
    pub runs_per_cluster: Vec<ClusterRuns>,
    /// CDF of distinct-cluster counts across applications
    pub cluster_count_cdf: Cdf,
    /// CDF of run counts across clusters
    pub run_count_cdf: Cdf,
}

/// Cluster characteristics, split by operation
///
/// An operation with no records is absent rather than failing the
/// other one.
#[derive(Debug, Clone, Serialize)]
pub struct CharacteristicsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<OperationCharacteristics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<OperationCharacteristics>,
}

/// CoV sample for one lifespan band, feeding the grouped box plot
#[derive(Debug, Clone, Serialize)]
pub struct RangeVariability {
    pub range: SpanRange,
    /// Defined CoV values of clusters in this band; degenerate
    /// clusters contribute nothing here.
    pub cov_values: Vec<f64>,
}

/// Temporal trends for one operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationTemporalTrends {
    pub operation: Operation,
    /// Per-cluster summary rows, including degenerate ones
    pub clusters: Vec<ClusterTemporal>,
    /// CDF over log10 of cluster time spans in days; absent when no
    /// cluster lives a full day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_days_log_cdf: Option<Cdf>,
    /// CDF over log10 of runs per day; absent when no cluster reaches
    /// one run per day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_rate_log_cdf: Option<Cdf>,
    /// Median span in days over all clusters (pre-log)
    pub median_span_days: f64,
    /// Median runs per day over clusters with a defined rate (pre-log)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_runs_per_day: Option<f64>,
    /// Clusters left out of the span log-CDF (lifespan under one day)
    pub short_lived_clusters: usize,
    /// CoV samples grouped by lifespan band, chart order, one entry
    /// per band even when empty
    pub variability_by_range: Vec<RangeVariability>,
}

/// Temporal trends, split by operation
#[derive(Debug, Clone, Serialize)]
pub struct TemporalReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<OperationTemporalTrends>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<OperationTemporalTrends>,
}

/// Complete analysis output
#[derive(Debug, Clone, Serialize)]
pub struct ClusterAnalysis {
    pub characteristics: CharacteristicsReport,
    /// Absent at `AnalysisDepth::Counts`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalReport>,
}

impl ClusterAnalysis {
    /// Serialize the analysis for the charting collaborator.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the analysis over the record set at the requested depth.
pub fn analyze(records: &[RunRecord], depth: AnalysisDepth) -> Result<ClusterAnalysis, StatsError> {
    info!(records = records.len(), depth = ?depth, "analyzing cluster records");
    let characteristics = characteristics(records)?;
    let temporal = match depth {
        AnalysisDepth::Counts => None,
        AnalysisDepth::Full => Some(temporal_trends(records)?),
    };
    Ok(ClusterAnalysis {
        characteristics,
        temporal,
    })
}

/// Cluster characteristics for both operations.
pub fn characteristics(records: &[RunRecord]) -> Result<CharacteristicsReport, StatsError> {
    Ok(CharacteristicsReport {
        read: operation_characteristics(records, Operation::Read)?,
        write: operation_characteristics(records, Operation::Write)?,
    })
}

/// Temporal trends for both operations.
pub fn temporal_trends(records: &[RunRecord]) -> Result<TemporalReport, StatsError> {
    Ok(TemporalReport {
        read: operation_temporal(records, Operation::Read)?,
        write: operation_temporal(records, Operation::Write)?,
    })
}

fn operation_characteristics(
    records: &[RunRecord],
    operation: Operation,
) -> Result<Option<OperationCharacteristics>, StatsError> {
    let clusters_per_application = counts::clusters_per_application(records, operation);
    if clusters_per_application.is_empty() {
        debug!(operation = %operation, "no records for operation, section omitted");
        return Ok(None);
    }
    let runs_per_cluster = counts::runs_per_cluster(records, operation);

    let cluster_counts: Vec<f64> = clusters_per_application
        .iter()
        .map(|a| a.cluster_count as f64)
        .collect();
    let run_counts: Vec<f64> = runs_per_cluster
        .iter()
        .map(|c| c.run_count as f64)
        .collect();

    // Non-empty by construction: every application has at least one
    // cluster and every cluster at least one run.
    let cluster_count_cdf = Cdf::from_sample(&cluster_counts, COUNT_BIN_WIDTH)?;
    let run_count_cdf = Cdf::from_sample(&run_counts, COUNT_BIN_WIDTH)?;

    debug!(
        operation = %operation,
        applications = clusters_per_application.len(),
        clusters = runs_per_cluster.len(),
        median_clusters = cluster_count_cdf.median,
        median_runs = run_count_cdf.median,
        "computed cluster characteristics"
    );

    Ok(Some(OperationCharacteristics {
        operation,
        clusters_per_application,
        runs_per_cluster,
        cluster_count_cdf,
        run_count_cdf,
    }))
}

fn operation_temporal(
    records: &[RunRecord],
    operation: Operation,
) -> Result<Option<OperationTemporalTrends>, StatsError> {
    let clusters = temporal::cluster_temporal_summaries(records, operation);
    if clusters.is_empty() {
        debug!(operation = %operation, "no records for operation, section omitted");
        return Ok(None);
    }

    let span_days: Vec<f64> = clusters
        .iter()
        .map(|c| c.time_span as f64 / SECONDS_PER_DAY)
        .collect();
    let median_span_days = cdf::median(&span_days)?;

    // Lifespans and rates are plotted on a log axis; values below one
    // day (or one run per day) have a negative log and stay out of the
    // zero-based bins, so they are filtered up front and counted.
    let log_spans: Vec<f64> = span_days
        .iter()
        .filter(|&&d| d >= 1.0)
        .map(|d| d.log10())
        .collect();
    let short_lived_clusters = span_days.len() - log_spans.len();
    let span_days_log_cdf = optional_cdf(&log_spans)?;

    let rates: Vec<f64> = clusters
        .iter()
        .filter_map(|c| c.run_rate.per_day())
        .collect();
    let median_runs_per_day = if rates.is_empty() {
        None
    } else {
        Some(cdf::median(&rates)?)
    };
    let log_rates: Vec<f64> = rates
        .iter()
        .filter(|&&r| r >= 1.0)
        .map(|r| r.log10())
        .collect();
    let run_rate_log_cdf = optional_cdf(&log_rates)?;

    let variability_by_range = SpanRange::ALL
        .iter()
        .map(|&range| RangeVariability {
            range,
            cov_values: clusters
                .iter()
                .filter(|c| c.range == Some(range))
                .filter_map(|c| c.gap_variability.cov())
                .collect(),
        })
        .collect();

    debug!(
        operation = %operation,
        clusters = clusters.len(),
        short_lived = short_lived_clusters,
        median_span_days,
        "computed temporal trends"
    );

    Ok(Some(OperationTemporalTrends {
        operation,
        clusters,
        span_days_log_cdf,
        run_rate_log_cdf,
        median_span_days,
        median_runs_per_day,
        short_lived_clusters,
        variability_by_range,
    }))
}

/// CDF over an already-filtered log sample; an empty sample is an
/// expected outcome here (everything short-lived), not a caller error.
fn optional_cdf(log_sample: &[f64]) -> Result<Option<Cdf>, StatsError> {
    if log_sample.is_empty() {
        return Ok(None);
    }
    match Cdf::from_sample(log_sample, LOG_BIN_WIDTH) {
        Ok(cdf) => Ok(Some(cdf)),
        Err(StatsError::EmptySample { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

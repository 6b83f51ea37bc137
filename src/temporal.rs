//! Per-cluster temporal summaries
//!
//! For every cluster of an operation (grouped by cluster number across
//! all applications, the way the clustering collaborator numbers them)
//! this computes the cluster's lifetime span, how often it runs, and
//! how regular its inter-arrival gaps are.
//!
//! Gaps are computed over members sorted chronologically by start time.
//! The degenerate cases are explicit values, never NaN: a single-member
//! cluster has no gaps ([`GapVariability::SingleRun`]), a cluster whose
//! runs all touch has a zero gap mean ([`GapVariability::ZeroMeanGap`]),
//! and a cluster whose runs share one timestamp has no defined run rate
//! ([`RunRate::ZeroSpan`]).

use crate::range::SpanRange;
use crate::record::{Operation, RunRecord, SECONDS_PER_DAY};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Average runs per day for a cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunRate {
    /// run_count / (span / 86400)
    PerDay(f64),
    /// Span is zero, the rate is undefined
    ZeroSpan,
}

impl RunRate {
    /// The rate value, if defined.
    pub fn per_day(&self) -> Option<f64> {
        match self {
            RunRate::PerDay(r) => Some(*r),
            RunRate::ZeroSpan => None,
        }
    }
}

/// Coefficient of variation of a cluster's inter-arrival gaps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapVariability {
    /// 100 × stddev(gaps) / mean(gaps)
    Cov(f64),
    /// One member, no gap sequence to measure
    SingleRun,
    /// Two or more members but every gap is zero, CoV undefined
    ZeroMeanGap,
}

impl GapVariability {
    /// The CoV percentage, if defined.
    pub fn cov(&self) -> Option<f64> {
        match self {
            GapVariability::Cov(v) => Some(*v),
            _ => None,
        }
    }
}

/// Temporal summary of one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterTemporal {
    pub cluster: u64,
    pub run_count: usize,
    /// max(end) − min(start) across members, seconds; always ≥ 0
    pub time_span: i64,
    pub run_rate: RunRate,
    pub gap_variability: GapVariability,
    /// Lifespan band, absent for spans of six months or more
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SpanRange>,
}

/// Summarize every cluster of `operation`.
///
/// Clusters are keyed by cluster number alone (members may come from
/// several applications) and appear in first-appearance order. No
/// records for the operation yields an empty vector.
pub fn cluster_temporal_summaries(
    records: &[RunRecord],
    operation: Operation,
) -> Vec<ClusterTemporal> {
    let mut order: Vec<u64> = Vec::new();
    let mut members: HashMap<u64, Vec<(i64, i64)>> = HashMap::new();

    for rec in records.iter().filter(|r| r.operation == operation) {
        let windows = members.entry(rec.cluster).or_insert_with(|| {
            order.push(rec.cluster);
            Vec::new()
        });
        windows.push((rec.start_time, rec.end_time));
    }

    let summaries: Vec<ClusterTemporal> = order
        .into_iter()
        .map(|cluster| {
            let mut windows = members.remove(&cluster).unwrap_or_default();
            windows.sort_by_key(|&(start, _)| start);
            summarize(cluster, &windows)
        })
        .collect();

    debug!(
        operation = %operation,
        clusters = summaries.len(),
        "computed cluster temporal summaries"
    );

    summaries
}

/// Summarize one cluster from its chronologically sorted windows.
fn summarize(cluster: u64, windows: &[(i64, i64)]) -> ClusterTemporal {
    let run_count = windows.len();
    let min_start = windows.iter().map(|w| w.0).min().unwrap_or(0);
    let max_end = windows.iter().map(|w| w.1).max().unwrap_or(0);
    let time_span = max_end - min_start;

    let run_rate = if time_span == 0 {
        RunRate::ZeroSpan
    } else {
        RunRate::PerDay(run_count as f64 / (time_span as f64 / SECONDS_PER_DAY))
    };

    let gap_variability = if run_count < 2 {
        GapVariability::SingleRun
    } else {
        let gaps: Vec<f64> = windows
            .windows(2)
            .map(|pair| (pair[1].0 - pair[0].1).abs() as f64)
            .collect();
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        if mean == 0.0 {
            GapVariability::ZeroMeanGap
        } else {
            let variance =
                gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
            GapVariability::Cov(variance.sqrt() / mean * 100.0)
        }
    };

    ClusterTemporal {
        cluster,
        run_count,
        time_span,
        run_rate,
        gap_variability,
        range: SpanRange::classify(time_span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(app: &str, cluster: u64, start: i64, end: i64) -> RunRecord {
        RunRecord::new(app, Operation::Read, cluster, start, end).unwrap()
    }

    #[test]
    fn test_regular_cluster_has_zero_cov() {
        // Windows (0,100), (200,300), (400,500): span 500,
        // gaps |200-100| and |400-300| = [100, 100].
        let records = vec![
            rec("a", 1, 0, 100),
            rec("a", 1, 200, 300),
            rec("a", 1, 400, 500),
        ];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.time_span, 500);
        assert_eq!(c.run_count, 3);
        assert_eq!(c.gap_variability, GapVariability::Cov(0.0));
        let rate = c.run_rate.per_day().unwrap();
        assert!((rate - 3.0 / (500.0 / 86_400.0)).abs() < 1e-9);
        assert!((rate - 518.4).abs() < 1e-9);
    }

    #[test]
    fn test_gaps_follow_chronological_order() {
        // Same cluster fed out of order; gaps must come from the
        // time-sorted sequence, not input order.
        let records = vec![
            rec("a", 1, 400, 500),
            rec("a", 1, 0, 100),
            rec("a", 1, 200, 300),
        ];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out[0].gap_variability, GapVariability::Cov(0.0));
    }

    #[test]
    fn test_single_member_cluster_flagged() {
        let records = vec![rec("a", 1, 0, 50)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out[0].gap_variability, GapVariability::SingleRun);
        assert_eq!(out[0].run_count, 1);
    }

    #[test]
    fn test_zero_span_cluster_flagged_not_nan() {
        let records = vec![rec("a", 1, 100, 100), rec("a", 1, 100, 100)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out[0].time_span, 0);
        assert_eq!(out[0].run_rate, RunRate::ZeroSpan);
        assert_eq!(out[0].run_rate.per_day(), None);
    }

    #[test]
    fn test_back_to_back_runs_have_zero_mean_gap() {
        let records = vec![rec("a", 1, 0, 100), rec("a", 1, 100, 200)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out[0].gap_variability, GapVariability::ZeroMeanGap);
        assert_eq!(out[0].gap_variability.cov(), None);
    }

    #[test]
    fn test_cluster_groups_across_applications() {
        let records = vec![rec("a", 7, 0, 100), rec("b", 7, 200, 300)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].run_count, 2);
        assert_eq!(out[0].time_span, 300);
    }

    #[test]
    fn test_cov_of_irregular_gaps() {
        // Gaps [100, 300]: mean 200, population stddev 100, CoV 50%.
        let records = vec![
            rec("a", 1, 0, 100),
            rec("a", 1, 200, 300),
            rec("a", 1, 600, 700),
        ];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        let cov = out[0].gap_variability.cov().unwrap();
        assert!((cov - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_span_never_negative() {
        let records = vec![rec("a", 1, 100, 100), rec("a", 1, 50, 120)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert!(out[0].time_span >= 0);
    }

    #[test]
    fn test_long_lived_cluster_has_no_range() {
        let records = vec![rec("a", 1, 0, 20_000_000)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        assert_eq!(out[0].range, None);
        // The row itself is still present with its other metrics.
        assert_eq!(out[0].time_span, 20_000_000);
    }

    #[test]
    fn test_no_records_for_operation_is_empty() {
        let records = vec![rec("a", 1, 0, 100)];
        assert!(cluster_temporal_summaries(&records, Operation::Write).is_empty());
    }

    #[test]
    fn test_overlapping_windows_use_absolute_gap() {
        // Second run starts before the first ends: |150 - 200| = 50.
        let records = vec![rec("a", 1, 0, 200), rec("a", 1, 150, 400)];
        let out = cluster_temporal_summaries(&records, Operation::Read);
        // One gap only, so stddev 0 over mean 50.
        assert_eq!(out[0].gap_variability, GapVariability::Cov(0.0));
    }
}

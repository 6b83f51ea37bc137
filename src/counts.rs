//! Grouping and counting of runs and clusters
//!
//! Answers the two cardinality questions behind the cluster
//! characteristics analysis: how many distinct clusters does each
//! application have, and how many runs does each cluster hold. Both
//! are computed per operation and preserve first-appearance order so
//! the output is stable for a given input table.

use crate::record::{Operation, RunRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Distinct-cluster count for one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationClusters {
    pub application: String,
    /// Number of distinct cluster numbers among this application's
    /// runs of the requested operation
    pub cluster_count: usize,
}

/// Run count for one (application, cluster) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterRuns {
    pub application: String,
    pub cluster: u64,
    pub run_count: usize,
}

/// Count distinct clusters per application for one operation.
///
/// Applications appear in first-appearance order of the input. An
/// operation with no matching records yields an empty vector; the
/// caller decides whether that is an `EmptySample` for its purposes.
pub fn clusters_per_application(
    records: &[RunRecord],
    operation: Operation,
) -> Vec<ApplicationClusters> {
    let mut order: Vec<&str> = Vec::new();
    let mut clusters: HashMap<&str, HashSet<u64>> = HashMap::new();

    for rec in records.iter().filter(|r| r.operation == operation) {
        let set = clusters.entry(rec.application.as_str()).or_insert_with(|| {
            order.push(rec.application.as_str());
            HashSet::new()
        });
        set.insert(rec.cluster);
    }

    debug!(
        operation = %operation,
        applications = order.len(),
        "counted clusters per application"
    );

    order
        .into_iter()
        .map(|app| ApplicationClusters {
            application: app.to_string(),
            cluster_count: clusters[app].len(),
        })
        .collect()
}

/// Count runs per (application, cluster) pair for one operation.
///
/// Ordered by application first appearance, then cluster first
/// appearance within that application.
pub fn runs_per_cluster(records: &[RunRecord], operation: Operation) -> Vec<ClusterRuns> {
    let mut app_order: Vec<&str> = Vec::new();
    let mut app_index: HashMap<&str, usize> = HashMap::new();
    let mut pair_order: Vec<(&str, u64)> = Vec::new();
    let mut counts: HashMap<(&str, u64), usize> = HashMap::new();

    for rec in records.iter().filter(|r| r.operation == operation) {
        let app = rec.application.as_str();
        if !app_index.contains_key(app) {
            app_index.insert(app, app_order.len());
            app_order.push(app);
        }
        let key = (app, rec.cluster);
        match counts.get_mut(&key) {
            Some(n) => *n += 1,
            None => {
                pair_order.push(key);
                counts.insert(key, 1);
            }
        }
    }

    // Records may interleave applications; regroup pairs under their
    // application while keeping within-application appearance order.
    pair_order.sort_by_key(|(app, _)| app_index[app]);

    debug!(
        operation = %operation,
        clusters = pair_order.len(),
        "counted runs per cluster"
    );

    pair_order
        .into_iter()
        .map(|(app, cluster)| ClusterRuns {
            application: app.to_string(),
            cluster,
            run_count: counts[&(app, cluster)],
        })
        .collect()
}

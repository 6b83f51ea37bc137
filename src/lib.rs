//! ioclust - descriptive statistics over clustered I/O-behavior records
//!
//! This library post-processes clustered I/O-behavior records from HPC
//! application runs: it groups records by application, cluster, and
//! operation, then computes cluster counts, run counts, temporal
//! summaries (time spans, run rates, inter-arrival variability),
//! lifespan range buckets, and empirical CDFs. Output is a set of
//! serializable summary structures for an external charting
//! collaborator; rendering, file paths, and orchestration stay outside.

pub mod cdf;
pub mod counts;
pub mod error;
pub mod range;
pub mod record;
pub mod report;
pub mod temporal;

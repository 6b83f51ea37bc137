//! Empirical CDF over fixed-width bins
//!
//! Converts a numeric sample into cumulative fractions over a histogram
//! whose bins start at zero, plus the sample median for caller-side
//! reference-line annotation. The median is a plain interpolated
//! median of the raw sample and does not depend on the bin width.

use crate::error::StatsError;
use serde::Serialize;

/// One point of an empirical CDF: left bin edge and the cumulative
/// fraction of the sample at or below that bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfPoint {
    pub bin: f64,
    pub fraction: f64,
}

/// Empirical CDF of a sample, with its median
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cdf {
    /// Ordered (bin left edge, cumulative fraction) pairs; the final
    /// fraction is exactly 1.0.
    pub points: Vec<CdfPoint>,
    /// Interpolated median of the raw sample.
    pub median: f64,
}

impl Cdf {
    /// Build the CDF of `sample` over bins of `bin_width` starting at 0.
    ///
    /// Bin edges run from 0 past the sample maximum in `bin_width`
    /// steps. Values below zero fall outside the histogram and do not
    /// contribute to the cumulative counts (callers filter or transform
    /// negative-capable samples first); cumulative fractions are
    /// normalized by the in-range count so the final fraction is 1.0.
    ///
    /// # Errors
    /// `EmptySample` if the sample is empty or no value lands in a bin;
    /// `InvalidBinWidth` for a non-positive or non-finite width.
    pub fn from_sample(sample: &[f64], bin_width: f64) -> Result<Self, StatsError> {
        if bin_width <= 0.0 || !bin_width.is_finite() {
            return Err(StatsError::InvalidBinWidth(bin_width));
        }
        if sample.is_empty() {
            return Err(StatsError::EmptySample { what: "cdf sample" });
        }

        let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(StatsError::EmptySample {
                what: "cdf sample with no finite values",
            });
        }

        // Edges 0, w, 2w, ... strictly below ceil(max)+1; one bin per
        // consecutive edge pair, last bin closed on the right.
        let edge_limit = max.max(0.0).ceil() + 1.0;
        let n_edges = (edge_limit / bin_width).ceil() as usize;
        let n_bins = n_edges.saturating_sub(1).max(1);
        let last_edge = n_bins as f64 * bin_width;

        let mut hist = vec![0u64; n_bins];
        for &x in sample {
            if !x.is_finite() || x < 0.0 || x > last_edge {
                continue;
            }
            let idx = ((x / bin_width).floor() as usize).min(n_bins - 1);
            hist[idx] += 1;
        }

        let mut cumulative = Vec::with_capacity(n_bins);
        let mut running = 0u64;
        for count in hist {
            running += count;
            cumulative.push(running);
        }
        let total = running;
        if total == 0 {
            return Err(StatsError::EmptySample {
                what: "cdf sample with no in-range values",
            });
        }

        let points = cumulative
            .into_iter()
            .enumerate()
            .map(|(i, c)| CdfPoint {
                bin: i as f64 * bin_width,
                fraction: c as f64 / total as f64,
            })
            .collect();

        Ok(Cdf {
            points,
            median: median(sample)?,
        })
    }
}

/// Interpolated median of a sample (linear interpolation between the
/// two middle order statistics for even sizes).
pub fn median(sample: &[f64]) -> Result<f64, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample {
            what: "median sample",
        });
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(percentile(&sorted, 50.0))
}

/// Percentile of pre-sorted data with linear interpolation.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_fraction_is_exactly_one() {
        let cdf = Cdf::from_sample(&[1.0, 2.0, 2.0, 5.0, 9.0], 1.0).unwrap();
        assert_eq!(cdf.points.last().unwrap().fraction, 1.0);
    }

    #[test]
    fn test_empty_sample_is_explicit_error() {
        let err = Cdf::from_sample(&[], 1.0).unwrap_err();
        assert!(matches!(err, StatsError::EmptySample { .. }));
    }

    #[test]
    fn test_bad_bin_width_rejected() {
        assert!(matches!(
            Cdf::from_sample(&[1.0], 0.0),
            Err(StatsError::InvalidBinWidth(_))
        ));
        assert!(matches!(
            Cdf::from_sample(&[1.0], -0.5),
            Err(StatsError::InvalidBinWidth(_))
        ));
    }

    #[test]
    fn test_bins_start_at_zero_with_fixed_width() {
        let cdf = Cdf::from_sample(&[0.5, 2.5], 1.0).unwrap();
        let bins: Vec<f64> = cdf.points.iter().map(|p| p.bin).collect();
        assert_eq!(bins, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_cumulative_fractions_are_monotone() {
        let cdf = Cdf::from_sample(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0], 1.0).unwrap();
        for pair in cdf.points.windows(2) {
            assert!(pair[1].fraction >= pair[0].fraction);
        }
    }

    #[test]
    fn test_known_distribution() {
        // Two values in [0,1), one in [1,2), one in [3,4).
        let cdf = Cdf::from_sample(&[0.1, 0.9, 1.5, 3.2], 1.0).unwrap();
        let fractions: Vec<f64> = cdf.points.iter().map(|p| p.fraction).collect();
        assert_eq!(fractions, [0.5, 0.75, 0.75, 1.0]);
    }

    #[test]
    fn test_negative_values_excluded_from_bins() {
        // Negative values (e.g. log10 of sub-unit inputs) fall outside
        // the zero-based histogram but still shape the median.
        let cdf = Cdf::from_sample(&[-1.0, 1.0, 2.0], 1.0).unwrap();
        assert_eq!(cdf.points.last().unwrap().fraction, 1.0);
        assert_eq!(cdf.median, 1.0);
    }

    #[test]
    fn test_all_negative_sample_is_empty() {
        let err = Cdf::from_sample(&[-3.0, -1.0], 1.0).unwrap_err();
        assert!(matches!(err, StatsError::EmptySample { .. }));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(median(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_median_unaffected_by_bin_width() {
        let sample = [1.0, 2.0, 3.0, 10.0];
        let coarse = Cdf::from_sample(&sample, 5.0).unwrap();
        let fine = Cdf::from_sample(&sample, 0.01).unwrap();
        assert_eq!(coarse.median, fine.median);
    }

    #[test]
    fn test_fractional_bin_width() {
        let cdf = Cdf::from_sample(&[0.005, 0.015], 0.01).unwrap();
        assert!((cdf.points[0].fraction - 0.5).abs() < 1e-12);
        assert_eq!(cdf.points[1].fraction, 1.0);
    }
}

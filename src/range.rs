//! Fixed time-span bands for cluster lifespans
//!
//! Clusters are compared across seven half-open lifespan bands, from
//! under a day up to six months. Spans of six months or more receive no
//! band and are excluded from bucketed groupings; their summary rows
//! are still emitted elsewhere.

use serde::Serialize;
use std::fmt;

/// Upper bounds of the seven bands, in seconds, ascending.
pub const RANGE_UPPER_BOUNDS: [i64; 7] = [
    86_400,     // 1 day
    259_200,    // 3 days
    604_800,    // 1 week
    1_296_000,  // 2 weeks
    2_592_000,  // 1 month
    7_776_000,  // 3 months
    15_552_000, // 6 months
];

/// One of the seven cluster lifespan bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SpanRange {
    #[serde(rename = "<1d")]
    UnderOneDay,
    #[serde(rename = "1-3d")]
    OneToThreeDays,
    #[serde(rename = "3d-1w")]
    ThreeDaysToOneWeek,
    #[serde(rename = "1w-2w")]
    OneToTwoWeeks,
    #[serde(rename = "2w-1M")]
    TwoWeeksToOneMonth,
    #[serde(rename = "1-3M")]
    OneToThreeMonths,
    #[serde(rename = "3-6M")]
    ThreeToSixMonths,
}

impl SpanRange {
    /// All bands in ascending span order, the order grouped reports use.
    pub const ALL: [SpanRange; 7] = [
        SpanRange::UnderOneDay,
        SpanRange::OneToThreeDays,
        SpanRange::ThreeDaysToOneWeek,
        SpanRange::OneToTwoWeeks,
        SpanRange::TwoWeeksToOneMonth,
        SpanRange::OneToThreeMonths,
        SpanRange::ThreeToSixMonths,
    ];

    /// Map a time span in seconds to its band, first match wins.
    ///
    /// Bands are half-open: a span equal to an upper bound falls in the
    /// next band (86400 s is `1-3d`, not `<1d`). Spans at or beyond six
    /// months return `None` and are dropped from bucketed analyses.
    pub fn classify(span_seconds: i64) -> Option<SpanRange> {
        RANGE_UPPER_BOUNDS
            .iter()
            .position(|&bound| span_seconds < bound)
            .map(|i| SpanRange::ALL[i])
    }

    /// Chart-facing label for the band.
    pub fn label(&self) -> &'static str {
        match self {
            SpanRange::UnderOneDay => "<1d",
            SpanRange::OneToThreeDays => "1-3d",
            SpanRange::ThreeDaysToOneWeek => "3d-1w",
            SpanRange::OneToTwoWeeks => "1w-2w",
            SpanRange::TwoWeeksToOneMonth => "2w-1M",
            SpanRange::OneToThreeMonths => "1-3M",
            SpanRange::ThreeToSixMonths => "3-6M",
        }
    }
}

impl fmt::Display for SpanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

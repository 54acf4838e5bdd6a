//! Corpus-relative score normalization
//!
//! A raw score is winsorized against the corpus, snapped to the
//! midpoint of the quantile bucket it lands in, and clamped to the
//! reporting range. Each result records which route produced it so a
//! report can explain the number it shows.

use serde::{Deserialize, Serialize};

use super::stats::{CorpusStats, DistributionStats};

/// Lower bound of the reporting range.
pub const SCORE_FLOOR: f64 = 0.0;
/// Upper bound of the reporting range.
pub const SCORE_CEIL: f64 = 5.0;

/// Which route a raw score took through normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePath {
    /// Snapped to the midpoint of a quantile bucket.
    BucketMidpoint,
    /// No usable bucket (constant corpus); winsorized value kept.
    Winsorized,
    /// Empty corpus; raw value clamped directly.
    RawClamp,
}

/// The quantile bucket a winsorized score landed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileBucket {
    pub low: f64,
    pub high: f64,
}

impl QuantileBucket {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// A normalized score plus the intermediate values that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedScore {
    pub value: f64,
    pub path: ScorePath,
    pub winsorized: Option<f64>,
    pub bucket: Option<QuantileBucket>,
}

/// Normalize a raw score against corpus statistics.
///
/// With a populated corpus: clip to the p5/p95 winsor bounds, then
/// scan the breakpoints lowest-first for the first bucket containing
/// the clipped value, bounds inclusive. A value sitting exactly on a
/// shared boundary therefore lands in the lower bucket. If fewer than
/// two breakpoints survive dedup, the winsorized value stands. With an
/// empty corpus the raw value is clamped as-is.
///
/// The returned value is always finite and within the reporting range;
/// a NaN input falls to the floor.
pub fn normalize(raw: f64, stats: &CorpusStats) -> NormalizedScore {
    match stats {
        CorpusStats::Empty => NormalizedScore {
            value: clamp_score(raw),
            path: ScorePath::RawClamp,
            winsorized: None,
            bucket: None,
        },
        CorpusStats::Populated(dist) => normalize_against(raw, dist),
    }
}

fn normalize_against(raw: f64, dist: &DistributionStats) -> NormalizedScore {
    let winsorized = raw.clamp(dist.winsor_low, dist.winsor_high);

    for pair in dist.breakpoints.windows(2) {
        if pair[0] <= winsorized && winsorized <= pair[1] {
            let bucket = QuantileBucket {
                low: pair[0],
                high: pair[1],
            };
            return NormalizedScore {
                value: clamp_score(bucket.midpoint()),
                path: ScorePath::BucketMidpoint,
                winsorized: Some(winsorized),
                bucket: Some(bucket),
            };
        }
    }

    // Constant corpus (single breakpoint) or a NaN that failed every
    // bucket comparison.
    NormalizedScore {
        value: clamp_score(winsorized),
        path: ScorePath::Winsorized,
        winsorized: Some(winsorized),
        bucket: None,
    }
}

/// Clamp to the reporting range; NaN falls to the floor.
fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_FLOOR;
    }
    value.clamp(SCORE_FLOOR, SCORE_CEIL)
}

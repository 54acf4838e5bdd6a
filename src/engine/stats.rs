//! Corpus distribution statistics
//!
//! Everything the normalizer needs from a score corpus is computed
//! here in one pass: winsorization bounds, quantile breakpoints, and
//! the summary numbers reports show. Non-finite values are dropped
//! before any statistic is taken; a corpus with nothing finite left is
//! the `Empty` sentinel, which scoring treats as "no context yet".

use serde::{Deserialize, Serialize};

/// Winsorization bounds, as percentiles of the corpus.
pub const WINSOR_LOW_PCT: f64 = 5.0;
pub const WINSOR_HIGH_PCT: f64 = 95.0;

/// Percentiles whose values become quantile-bucket breakpoints.
pub const BREAKPOINT_PCTS: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

/// Distribution statistics for a score corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorpusStats {
    /// No finite scores observed yet. Normalization has nothing to
    /// rank against and falls back to clamping raw values.
    Empty,
    Populated(DistributionStats),
}

/// Statistics over the finite scores of a populated corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    /// Number of finite scores used.
    pub count: usize,
    /// Non-finite scores ignored.
    pub dropped: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// 5th percentile, the winsorization floor.
    pub winsor_low: f64,
    /// 95th percentile, the winsorization ceiling.
    pub winsor_high: f64,
    /// Quantile breakpoints in ascending order, duplicates removed.
    /// Fewer than two survive only when the corpus is constant.
    pub breakpoints: Vec<f64>,
}

impl CorpusStats {
    /// Compute statistics from corpus scores. Pure: the same scores
    /// always produce the same statistics.
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut finite: Vec<f64> = scores.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return CorpusStats::Empty;
        }
        let dropped = scores.len() - finite.len();
        finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = finite.len();
        let mean = finite.iter().sum::<f64>() / n as f64;

        // Percentiles of a sorted slice are nondecreasing in pct, so
        // consecutive dedup removes every duplicate.
        let mut breakpoints: Vec<f64> = BREAKPOINT_PCTS
            .iter()
            .map(|&pct| percentile(&finite, pct))
            .collect();
        breakpoints.dedup();

        CorpusStats::Populated(DistributionStats {
            count: n,
            dropped,
            mean,
            min: finite[0],
            max: finite[n - 1],
            winsor_low: percentile(&finite, WINSOR_LOW_PCT),
            winsor_high: percentile(&finite, WINSOR_HIGH_PCT),
            breakpoints,
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CorpusStats::Empty)
    }

    pub fn populated(&self) -> Option<&DistributionStats> {
        match self {
            CorpusStats::Empty => None,
            CorpusStats::Populated(dist) => Some(dist),
        }
    }
}

/// Percentile of a sorted slice, interpolating linearly between the
/// two nearest ranks (the definition NumPy defaults to). The rank of
/// `pct` is `pct/100 * (n-1)`.
pub(crate) fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(sorted.len() - 1);
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

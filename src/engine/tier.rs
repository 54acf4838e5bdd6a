//! Quantile tier classification
//!
//! Tiers are relative: a score is Very High because it sits in the top
//! fifth of what this corpus has produced, not because it crosses a
//! fixed threshold. Cuts are taken over the raw corpus (no
//! winsorization), so classification is independent of normalization
//! and works on any sub-corpus, such as a single label's history.

use serde::{Deserialize, Serialize};

use super::stats::percentile;
use crate::models::Tier;

/// Percentile cut points separating the five tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCuts {
    pub p20: f64,
    pub p40: f64,
    pub p60: f64,
    pub p80: f64,
}

impl TierCuts {
    /// Compute cuts from corpus scores. Non-finite values are dropped
    /// first; an empty (or all non-finite) corpus has no cuts, and
    /// callers fall back to `Tier::default()`.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let mut finite: Vec<f64> = scores.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Some(Self {
            p20: percentile(&finite, 20.0),
            p40: percentile(&finite, 40.0),
            p60: percentile(&finite, 60.0),
            p80: percentile(&finite, 80.0),
        })
    }

    /// Classify a score against the cuts.
    ///
    /// Each band includes its lower cut: at or above p80 is VeryHigh,
    /// [p60, p80) is High, and so on down to below p20 as VeryLow.
    /// Duplicate cuts from a skewed corpus collapse the bands between
    /// them, which resolves ties upward.
    pub fn classify(&self, score: f64) -> Tier {
        if score >= self.p80 {
            Tier::VeryHigh
        } else if score >= self.p60 {
            Tier::High
        } else if score >= self.p40 {
            Tier::Medium
        } else if score >= self.p20 {
            Tier::Low
        } else {
            Tier::VeryLow
        }
    }
}

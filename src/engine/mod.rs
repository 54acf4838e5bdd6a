//! Risk scoring pipeline
//!
//! [`RiskEngine`] turns detections into normalized, tier-classified
//! scores. All corpus context is captured up front in a
//! [`ScoringContext`] built from an immutable snapshot; scoring itself
//! is pure, so a batch fans out across threads without contention and
//! two contexts from the same snapshot always agree.

pub mod adjust;
pub mod normalize;
pub mod stats;
pub mod tier;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::corpus::CorpusSnapshot;
use crate::models::{Detection, Tier};
use crate::priors::RiskPriorTable;

pub use normalize::{NormalizedScore, QuantileBucket, ScorePath, SCORE_CEIL, SCORE_FLOOR};
pub use stats::{CorpusStats, DistributionStats};
pub use tier::TierCuts;

/// Corpus-derived context for one scoring pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringContext {
    pub corpus_version: u64,
    pub corpus_size: usize,
    pub stats: CorpusStats,
    /// Tier cut points; absent when the corpus has no finite scores.
    pub cuts: Option<TierCuts>,
}

impl ScoringContext {
    pub fn from_snapshot(snapshot: &CorpusSnapshot) -> Self {
        Self {
            corpus_version: snapshot.version,
            corpus_size: snapshot.scores.len(),
            stats: CorpusStats::from_scores(&snapshot.scores),
            cuts: TierCuts::from_scores(&snapshot.scores),
        }
    }
}

/// A detection with its full scoring breakdown.
///
/// Every intermediate the pipeline produced is kept so reports can
/// show where a number came from instead of a bare final score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDetection {
    pub label: String,
    pub confidence: f64,
    pub base_risk: f64,
    pub confidence_factor: f64,
    pub raw_score: f64,
    /// Final normalized score in [0, 5].
    pub score: f64,
    pub path: ScorePath,
    pub winsorized: Option<f64>,
    pub bucket: Option<QuantileBucket>,
    pub tier: Tier,
}

/// Scoring engine: label priors plus the pure scoring pipeline.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    priors: RiskPriorTable,
}

impl RiskEngine {
    pub fn new(priors: RiskPriorTable) -> Self {
        Self { priors }
    }

    /// Score one detection against the given corpus context.
    pub fn score(&self, ctx: &ScoringContext, detection: &Detection) -> ScoredDetection {
        let base_risk = self.priors.base_risk(&detection.label);
        if !self.priors.is_known(&detection.label) {
            debug!(
                "no prior for label '{}', using default {base_risk}",
                detection.label
            );
        }

        let confidence_factor = adjust::confidence_factor(detection.confidence);
        let raw_score = base_risk * confidence_factor;
        let normalized = normalize::normalize(raw_score, &ctx.stats);
        let tier = match &ctx.cuts {
            Some(cuts) => cuts.classify(normalized.value),
            None => Tier::default(),
        };

        ScoredDetection {
            label: detection.label.clone(),
            confidence: detection.confidence,
            base_risk,
            confidence_factor,
            raw_score,
            score: normalized.value,
            path: normalized.path,
            winsorized: normalized.winsorized,
            bucket: normalized.bucket,
            tier,
        }
    }

    /// Score a batch in parallel. Results keep input order.
    pub fn score_batch(
        &self,
        ctx: &ScoringContext,
        detections: &[Detection],
    ) -> Vec<ScoredDetection> {
        detections
            .par_iter()
            .map(|detection| self.score(ctx, detection))
            .collect()
    }
}

/// Pick the headline detection of a batch: highest confidence wins and
/// the first one scanned wins ties.
pub fn headline(scored: &[ScoredDetection]) -> Option<&ScoredDetection> {
    let mut best: Option<&ScoredDetection> = None;
    for candidate in scored {
        match best {
            Some(current) if candidate.confidence > current.confidence => best = Some(candidate),
            None => best = Some(candidate),
            _ => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_from(scores: Vec<f64>) -> ScoringContext {
        ScoringContext::from_snapshot(&CorpusSnapshot::from_scores(scores))
    }

    fn detection(label: &str, confidence: f64) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_first_detection_ever() {
        // No corpus: the adjusted prior passes through with a clamp,
        // and the tier falls back to the default.
        let engine = RiskEngine::default();
        let ctx = context_from(vec![]);
        let scored = engine.score(&ctx, &detection("Fish_net", 0.8));

        assert!((scored.raw_score - 4.05).abs() < 1e-12);
        assert!((scored.score - 4.05).abs() < 1e-12);
        assert_eq!(scored.path, ScorePath::RawClamp);
        assert_eq!(scored.tier, Tier::Medium);
    }

    #[test]
    fn test_score_against_populated_corpus() {
        let engine = RiskEngine::default();
        let ctx = context_from(vec![2.0, 2.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.8, 5.0, 1.5]);
        let scored = engine.score(&ctx, &detection("Fish_net", 0.8));

        // raw 4.05 -> bucket (3.7, 4.56) -> midpoint 4.13.
        assert!((scored.base_risk - 4.5).abs() < 1e-12);
        assert!((scored.confidence_factor - 0.9).abs() < 1e-12);
        assert!((scored.score - 4.13).abs() < 1e-9);
        assert_eq!(scored.path, ScorePath::BucketMidpoint);
        // Tier cuts here are 2.4 / 3.0 / 3.7 / 4.56, so 4.13 lands in
        // [p60, p80) as High.
        assert_eq!(scored.tier, Tier::High);
    }

    #[test]
    fn test_unknown_label_uses_default_prior() {
        let engine = RiskEngine::default();
        let ctx = context_from(vec![]);
        let scored = engine.score(&ctx, &detection("Styrofoam", 1.0));
        assert!((scored.base_risk - 3.0).abs() < 1e-12);
        assert!((scored.score - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let engine = RiskEngine::default();
        let ctx = context_from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let detections: Vec<Detection> = (0..50)
            .map(|i| detection(if i % 2 == 0 { "Plastic" } else { "Wood" }, 0.5))
            .collect();

        let scored = engine.score_batch(&ctx, &detections);
        assert_eq!(scored.len(), detections.len());
        for (s, d) in scored.iter().zip(&detections) {
            assert_eq!(s.label, d.label);
        }
    }

    #[test]
    fn test_batch_matches_single_scoring() {
        let engine = RiskEngine::default();
        let ctx = context_from(vec![2.0, 2.5, 3.0, 3.5, 4.0]);
        let detections = vec![
            detection("Fish_net", 0.9),
            detection("Wood", 0.4),
            detection("Bottle", 0.75),
        ];

        let batch = engine.score_batch(&ctx, &detections);
        for (b, d) in batch.iter().zip(&detections) {
            let single = engine.score(&ctx, d);
            assert_eq!(b.score, single.score);
            assert_eq!(b.tier, single.tier);
        }
    }

    #[test]
    fn test_headline_highest_confidence_first_wins_ties() {
        let engine = RiskEngine::default();
        let ctx = context_from(vec![]);
        let scored = engine.score_batch(
            &ctx,
            &[
                detection("Wood", 0.7),
                detection("Fish_net", 0.9),
                detection("Plastic", 0.9),
                detection("Glass", 0.2),
            ],
        );

        let top = headline(&scored).unwrap();
        assert_eq!(top.label, "Fish_net");
        assert!(headline(&[]).is_none());
    }
}

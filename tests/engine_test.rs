//! Scoring pipeline tests
//!
//! Verifies the full prior -> confidence adjustment -> winsorize ->
//! bucket midpoint -> tier pipeline against hand-computed corpora,
//! including the corpus-relative behavior that makes the same
//! detection score differently as the history changes.

use std::collections::HashMap;

use tiderisk::engine::{self, ScorePath};
use tiderisk::{CorpusSnapshot, Detection, RiskEngine, RiskPriorTable, ScoringContext, Tier};

fn context(scores: &[f64]) -> ScoringContext {
    ScoringContext::from_snapshot(&CorpusSnapshot::from_scores(scores.to_vec()))
}

fn detection(label: &str, confidence: f64) -> Detection {
    Detection {
        label: label.to_string(),
        confidence,
    }
}

#[test]
fn test_cold_start_passes_through_clamped() {
    let engine = RiskEngine::default();
    let ctx = context(&[]);

    let scored = engine.score(&ctx, &detection("Fish_net", 0.8));
    assert!((scored.score - 4.05).abs() < 1e-12);
    assert_eq!(scored.path, ScorePath::RawClamp);
    assert_eq!(scored.tier, Tier::Medium);
    assert!(scored.bucket.is_none());
    assert!(scored.winsorized.is_none());
}

#[test]
fn test_populated_corpus_full_pipeline() {
    let engine = RiskEngine::default();
    let ctx = context(&[2.0, 2.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.8, 5.0, 1.5]);

    // Fish_net prior 4.5 at confidence 0.8: raw 4.05, winsor bounds
    // (1.725, 4.91) leave it alone, bucket (3.7, 4.56) snaps it to
    // 4.13, and the p60 cut at 3.7 makes that High.
    let scored = engine.score(&ctx, &detection("Fish_net", 0.8));
    assert!((scored.base_risk - 4.5).abs() < 1e-12);
    assert!((scored.confidence_factor - 0.9).abs() < 1e-12);
    assert!((scored.raw_score - 4.05).abs() < 1e-12);
    assert!((scored.score - 4.13).abs() < 1e-9);
    assert_eq!(scored.path, ScorePath::BucketMidpoint);
    assert_eq!(scored.tier, Tier::High);
}

#[test]
fn test_same_detection_shifts_with_the_corpus() {
    // The point of corpus-relative scoring: a raw 4.05 is an extreme
    // outlier in a survey area full of low scores, and merely high in
    // one that has seen worse.
    let engine = RiskEngine::default();
    let net = detection("Fish_net", 0.8);

    let calm = context(&[1.0, 1.2, 1.4, 1.6, 1.8, 2.0]);
    let scored = engine.score(&calm, &net);
    // Winsorized down to p95 = 1.95, bucket (1.8, 2.0) -> 1.9.
    assert!((scored.score - 1.9).abs() < 1e-9);
    assert_eq!(scored.tier, Tier::VeryHigh);

    let rough = context(&[2.0, 2.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.8, 5.0, 1.5]);
    let scored = engine.score(&rough, &net);
    assert!((scored.score - 4.13).abs() < 1e-9);
    assert_eq!(scored.tier, Tier::High);
}

#[test]
fn test_overconfident_detection_extrapolates() {
    // Detector confidences above 1.0 keep scaling the prior; the final
    // clamp is the only ceiling.
    let engine = RiskEngine::default();
    let ctx = context(&[]);

    let scored = engine.score(&ctx, &detection("Fish_net", 1.4));
    assert!((scored.confidence_factor - 1.2).abs() < 1e-12);
    assert!((scored.raw_score - 5.4).abs() < 1e-12);
    assert!((scored.score - 5.0).abs() < 1e-12);
}

#[test]
fn test_non_finite_corpus_scores_are_dropped() {
    let engine = RiskEngine::default();
    let ctx = context(&[f64::NAN, 2.0, f64::INFINITY, 3.0, 4.0, f64::NEG_INFINITY]);

    let populated = ctx.stats.populated().unwrap();
    assert_eq!(populated.count, 3);
    assert_eq!(populated.dropped, 3);

    // Scoring still works against the surviving finite scores.
    let scored = engine.score(&ctx, &detection("Wood", 0.5));
    assert!(scored.score.is_finite());
}

#[test]
fn test_config_prior_overrides_reach_scores() {
    let mut overrides = HashMap::new();
    overrides.insert("Fish_net".to_string(), 2.0);
    overrides.insert("Drone".to_string(), 1.5);
    let engine = RiskEngine::new(RiskPriorTable::with_overrides(overrides, Some(0.5)));
    let ctx = context(&[]);

    // Override beats the built-in 4.5.
    let net = engine.score(&ctx, &detection("Fish_net", 1.0));
    assert!((net.base_risk - 2.0).abs() < 1e-12);

    // New labels come straight from config.
    let drone = engine.score(&ctx, &detection("Drone", 1.0));
    assert!((drone.base_risk - 1.5).abs() < 1e-12);

    // Unknown labels use the configured default instead of 3.0.
    let other = engine.score(&ctx, &detection("Styrofoam", 1.0));
    assert!((other.base_risk - 0.5).abs() < 1e-12);
}

#[test]
fn test_batch_scoring_and_headline() {
    let engine = RiskEngine::default();
    let ctx = context(&[2.0, 2.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.8, 5.0, 1.5]);
    let detections = vec![
        detection("Wood", 0.95),
        detection("Fish_net", 0.8),
        detection("Plastic", 0.6),
    ];

    let scored = engine.score_batch(&ctx, &detections);
    assert_eq!(scored.len(), 3);
    // Input order is preserved even though scoring fans out.
    assert_eq!(scored[0].label, "Wood");
    assert_eq!(scored[2].label, "Plastic");

    // Headline is the highest-confidence detection, not the highest
    // score.
    let top = engine::headline(&scored).unwrap();
    assert_eq!(top.label, "Wood");
}

#[test]
fn test_identical_scores_collapse_buckets() {
    // A constant corpus gives a single deduplicated breakpoint, so
    // normalization stops at the winsorized value.
    let engine = RiskEngine::default();
    let ctx = context(&[3.0, 3.0, 3.0, 3.0]);

    let scored = engine.score(&ctx, &detection("Glass", 0.9));
    assert_eq!(scored.path, ScorePath::Winsorized);
    assert!((scored.score - 3.0).abs() < 1e-12);
}

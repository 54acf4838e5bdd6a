//! Output reporters for Tiderisk results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors and a tier legend
//! - `json` - Machine-readable JSON with the tier palette attached
//!
//! The tier palette lives here: color is a property of how results are
//! shown, never an input to scoring.

mod json;
mod text;

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::engine::{CorpusStats, ScoredDetection, TierCuts};
use crate::models::{Observation, Tier};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Fixed hex color per tier, shared by every surface that shows one
/// (terminal legend, JSON consumers, downstream map overlays).
pub fn tier_hex(tier: Tier) -> &'static str {
    match tier {
        Tier::VeryLow => "#2DC937",
        Tier::Low => "#99C140",
        Tier::Medium => "#E7B416",
        Tier::High => "#DB7B2B",
        Tier::VeryHigh => "#CC3232",
    }
}

/// Result of scoring one detector run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub corpus_version: u64,
    pub corpus_size: usize,
    /// Highest-confidence detection of the run, if any.
    pub headline: Option<ScoredDetection>,
    pub detections: Vec<ScoredDetection>,
    /// Whether the headline was appended to the observation log:
    /// `None` when recording was not requested, `Some(false)` when the
    /// log already held it.
    pub recorded: Option<bool>,
}

/// Corpus distribution summary.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub corpus_version: u64,
    pub corpus_size: usize,
    pub stats: CorpusStats,
    pub cuts: Option<TierCuts>,
    pub label_counts: BTreeMap<String, usize>,
}

/// Tier listing of recorded observations.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub corpus_version: u64,
    pub corpus_size: usize,
    /// Label filter, when classification ran against one label's
    /// sub-corpus.
    pub label: Option<String>,
    /// Minimum tier filter applied to the rows.
    pub min_tier: Option<Tier>,
    pub cuts: Option<TierCuts>,
    pub rows: Vec<ClassifiedRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRow {
    pub score: f64,
    pub tier: Tier,
    /// Absent for bare-score corpora, which carry no records.
    pub observation: Option<Observation>,
}

/// Render a score report in the specified format
pub fn score_report(report: &ScoreReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_score(report),
        OutputFormat::Json => json::render(report),
    }
}

/// Render a stats report in the specified format
pub fn stats_report(report: &StatsReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_stats(report),
        OutputFormat::Json => json::render(report),
    }
}

/// Render a classify report in the specified format
pub fn classify_report(report: &ClassifyReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_classify(report),
        OutputFormat::Json => json::render(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::corpus::CorpusSnapshot;
    use crate::engine::{RiskEngine, ScoringContext};
    use crate::models::Detection;

    /// Create a small ScoreReport for testing
    pub(crate) fn sample_score_report() -> ScoreReport {
        let engine = RiskEngine::default();
        let snapshot = CorpusSnapshot::from_scores(vec![
            2.0, 2.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.8, 5.0, 1.5,
        ]);
        let ctx = ScoringContext::from_snapshot(&snapshot);
        let detections = vec![
            Detection {
                label: "Fish_net".to_string(),
                confidence: 0.8,
            },
            Detection {
                label: "Wood".to_string(),
                confidence: 0.55,
            },
        ];
        let scored = engine.score_batch(&ctx, &detections);
        let headline = crate::engine::headline(&scored).cloned();

        ScoreReport {
            corpus_version: snapshot.version,
            corpus_size: snapshot.scores.len(),
            headline,
            detections: scored,
            recorded: None,
        }
    }

    /// Create a small StatsReport for testing
    pub(crate) fn sample_stats_report() -> StatsReport {
        let scores = [2.0, 2.5, 3.0, 3.0, 3.5, 4.0, 4.5, 4.8, 5.0, 1.5];
        let mut label_counts = BTreeMap::new();
        label_counts.insert("Fish_net".to_string(), 6);
        label_counts.insert("Plastic".to_string(), 4);

        StatsReport {
            corpus_version: scores.len() as u64,
            corpus_size: scores.len(),
            stats: CorpusStats::from_scores(&scores),
            cuts: TierCuts::from_scores(&scores),
            label_counts,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("terminal").unwrap(),
            OutputFormat::Text
        );
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_palette_is_distinct() {
        let tiers = [
            Tier::VeryLow,
            Tier::Low,
            Tier::Medium,
            Tier::High,
            Tier::VeryHigh,
        ];
        for a in tiers {
            for b in tiers {
                if a != b {
                    assert_ne!(tier_hex(a), tier_hex(b));
                }
            }
        }
    }
}

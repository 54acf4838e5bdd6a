//! Core data models for Tiderisk
//!
//! These models are shared across the engine, the observation store,
//! and the reporters: detections coming in, observations going to disk,
//! and the ordinal risk tier assigned to a score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a deterministic observation ID based on content hash.
///
/// This ensures observations have stable IDs across runs, enabling:
/// - Deduplication when the same analysis is recorded twice
/// - Tracking an observation across exported corpus files
///
/// The ID is a 16-character hex string derived from hashing:
/// - label (what was detected)
/// - source image (where it was detected, empty when unknown)
/// - risk score rounded to 4 decimal places
/// - latitude/longitude rounded to 6 decimal places (empty when unknown)
pub fn deterministic_observation_id(
    label: &str,
    source_image: Option<&str>,
    risk_score: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> String {
    // MD5 for stable cross-version hashing; DefaultHasher is
    // intentionally not stable across Rust/compiler versions.
    let lat = latitude.map(|v| format!("{v:.6}")).unwrap_or_default();
    let lon = longitude.map(|v| format!("{v:.6}")).unwrap_or_default();
    let input = format!(
        "{label}\n{}\n{risk_score:.4}\n{lat}\n{lon}",
        source_image.unwrap_or("")
    );
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Risk tiers assigned relative to the observed corpus.
///
/// Ordering matters: variants are declared lowest to highest so that
/// `Ord` comparisons and `--min-tier` style filters work directly.
/// `Medium` is the default a caller falls back to when no corpus exists
/// yet to classify against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    VeryLow,
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl Tier {
    /// Human-readable name for report output.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::VeryLow => "Very Low",
            Tier::Low => "Low",
            Tier::Medium => "Medium",
            Tier::High => "High",
            Tier::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::VeryLow => write!(f, "very-low"),
            Tier::Low => write!(f, "low"),
            Tier::Medium => write!(f, "medium"),
            Tier::High => write!(f, "high"),
            Tier::VeryHigh => write!(f, "very-high"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "very-low" | "verylow" => Ok(Tier::VeryLow),
            "low" => Ok(Tier::Low),
            "medium" => Ok(Tier::Medium),
            "high" => Ok(Tier::High),
            "very-high" | "veryhigh" => Ok(Tier::VeryHigh),
            other => Err(format!(
                "unknown tier '{other}' (expected: very-low, low, medium, high, very-high)"
            )),
        }
    }
}

/// A single detected object, as produced by an upstream detector run.
///
/// `class` is accepted as an alias for `label` so raw detector exports
/// parse without rewriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    #[serde(alias = "class")]
    pub label: String,
    pub confidence: f64,
}

/// A durable record of one scored detection, as stored in the
/// observation log and fed back in as corpus history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub confidence: f64,
    pub risk_score: f64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub source_image: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// Fill in the deterministic ID if the record does not carry one.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = deterministic_observation_id(
                &self.label,
                self.source_image.as_deref(),
                self.risk_score,
                self.latitude,
                self.longitude,
            );
        }
    }
}

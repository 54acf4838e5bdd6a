//! Tiderisk - corpus-relative risk scoring for marine debris detections
//!
//! Detector output (a debris label plus a confidence) is turned into a
//! stable risk score in three steps: a label prior is scaled by
//! confidence, the result is winsorized against the recorded
//! observation corpus and snapped to a quantile bucket midpoint, and
//! the final score is classified into one of five relative tiers.
//!
//! Everything is corpus-relative by design: scores and tiers shift as
//! the observation history grows, so a "high" find is high for *your*
//! survey area, not against a fixed global scale.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod models;
pub mod priors;
pub mod reporters;

pub use corpus::{CorpusSnapshot, ObservationLog};
pub use engine::{RiskEngine, ScoredDetection, ScoringContext};
pub use models::{Detection, Observation, Tier};
pub use priors::RiskPriorTable;

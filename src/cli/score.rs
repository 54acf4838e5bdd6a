use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::load_project_config;
use crate::corpus::{self, CorpusSnapshot, ObservationLog};
use crate::engine::{self, RiskEngine, ScoringContext};
use crate::models::{Detection, Observation};
use crate::reporters::{self, ScoreReport};

/// Detector run file shapes: a bare array of detections, or an object
/// wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectionsFile {
    Flat(Vec<Detection>),
    Wrapped {
        #[serde(alias = "all_detections")]
        detections: Vec<Detection>,
    },
}

fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read detections file {}", path.display()))?;
    let file: DetectionsFile = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse detections file {}", path.display()))?;
    Ok(match file {
        DetectionsFile::Flat(detections) => detections,
        DetectionsFile::Wrapped { detections } => detections,
    })
}

/// Run the score command
pub fn run(
    path: &Path,
    label: Option<String>,
    confidence: Option<f64>,
    detections_file: Option<&Path>,
    corpus: Option<PathBuf>,
    record: bool,
    image: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_project_config(path);
    let format = super::resolve_format(format, &config)?;
    let corpus_path = super::resolve_corpus(corpus, &config, path);
    let engine = RiskEngine::new(config.prior_table());

    let detections = match (label, confidence, detections_file) {
        (Some(label), Some(confidence), None) => vec![Detection { label, confidence }],
        (None, None, Some(file)) => {
            let mut detections = load_detections(file)?;
            if detections.is_empty() {
                // A clean detector run is still one analysis: Unknown
                // at zero confidence, same as an image with no boxes.
                debug!("no detections in {}; scoring as Unknown", file.display());
                detections.push(Detection {
                    label: "Unknown".to_string(),
                    confidence: 0.0,
                });
            }
            detections
        }
        _ => bail!("Provide --label with --confidence, or --detections FILE"),
    };
    debug!(
        "scoring {} detection(s) against corpus {}",
        detections.len(),
        corpus_path.display()
    );

    // Recording needs the full log; read-only scoring accepts bare
    // score arrays too.
    let mut log = if record {
        Some(ObservationLog::open(&corpus_path)?)
    } else {
        None
    };
    let snapshot = match &log {
        Some(log) => log.snapshot(),
        None => CorpusSnapshot::from_scores(corpus::load_scores(&corpus_path)?),
    };

    let ctx = ScoringContext::from_snapshot(&snapshot);
    let scored = engine.score_batch(&ctx, &detections);
    let headline = engine::headline(&scored).cloned();

    let mut recorded = None;
    if let (Some(log), Some(top)) = (log.as_mut(), headline.as_ref()) {
        let appended = log.append(Observation {
            id: String::new(),
            label: top.label.clone(),
            confidence: top.confidence,
            risk_score: top.score,
            latitude: lat,
            longitude: lon,
            source_image: image,
            recorded_at: None,
        });
        if appended {
            log.save()?;
            debug!("recorded headline observation to {}", log.path().display());
        }
        recorded = Some(appended);
    }

    let report = ScoreReport {
        corpus_version: ctx.corpus_version,
        corpus_size: ctx.corpus_size,
        headline,
        detections: scored,
        recorded,
    };
    let rendered = reporters::score_report(&report, format)?;
    super::emit(&rendered, output)
}

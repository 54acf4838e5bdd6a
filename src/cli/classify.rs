use anyhow::{anyhow, bail, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::config::load_project_config;
use crate::corpus::{self, ObservationLog, StoreError};
use crate::engine::TierCuts;
use crate::models::Tier;
use crate::reporters::{self, ClassifiedRow, ClassifyReport};

/// Run the classify command
pub fn run(
    path: &Path,
    label: Option<String>,
    tier: Option<&str>,
    corpus: Option<PathBuf>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_project_config(path);
    let format = super::resolve_format(format, &config)?;
    let corpus_path = super::resolve_corpus(corpus, &config, path);
    let min_tier = tier
        .map(str::parse::<Tier>)
        .transpose()
        .map_err(|e| anyhow!(e))?;

    // Tier cuts come from the sub-corpus being listed: all scores, or
    // one label's own history when --label narrows the view. The
    // report header always describes the full corpus.
    let (corpus_version, corpus_size, cuts, mut rows) = match ObservationLog::open(&corpus_path) {
        Ok(log) => {
            let snapshot = log.snapshot();
            let (cuts, records): (_, Vec<_>) = match &label {
                Some(label) => (
                    TierCuts::from_scores(&log.scores_for_label(label)),
                    log.records().iter().filter(|r| &r.label == label).collect(),
                ),
                None => (
                    TierCuts::from_scores(&snapshot.scores),
                    log.records().iter().collect(),
                ),
            };
            let rows: Vec<ClassifiedRow> = records
                .into_iter()
                .map(|obs| ClassifiedRow {
                    score: obs.risk_score,
                    tier: cuts
                        .map(|c| c.classify(obs.risk_score))
                        .unwrap_or_default(),
                    observation: Some(obs.clone()),
                })
                .collect();
            (snapshot.version, snapshot.scores.len(), cuts, rows)
        }
        Err(StoreError::ScoresOnly { .. }) => {
            if label.is_some() {
                bail!(
                    "Corpus {} holds bare scores with no labels; --label needs full observation records",
                    corpus_path.display()
                );
            }
            let scores = corpus::load_scores(&corpus_path)?;
            let cuts = TierCuts::from_scores(&scores);
            let rows = scores
                .iter()
                .map(|&score| ClassifiedRow {
                    score,
                    tier: cuts.map(|c| c.classify(score)).unwrap_or_default(),
                    observation: None,
                })
                .collect();
            (scores.len() as u64, scores.len(), cuts, rows)
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(min) = min_tier {
        rows.retain(|r| r.tier >= min);
    }
    rows.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let report = ClassifyReport {
        corpus_version,
        corpus_size,
        label,
        min_tier,
        cuts,
        rows,
    };
    let rendered = reporters::classify_report(&report, format)?;
    super::emit(&rendered, output)
}

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::load_project_config;
use crate::corpus::{self, CorpusSnapshot, ObservationLog, StoreError};
use crate::engine::{CorpusStats, TierCuts};
use crate::reporters::{self, StatsReport};

/// Run the stats command
pub fn run(
    path: &Path,
    corpus: Option<PathBuf>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_project_config(path);
    let format = super::resolve_format(format, &config)?;
    let corpus_path = super::resolve_corpus(corpus, &config, path);

    // Full logs give label counts; bare score arrays still give the
    // distribution.
    let (snapshot, label_counts) = match ObservationLog::open(&corpus_path) {
        Ok(log) => (log.snapshot(), log.label_counts()),
        Err(StoreError::ScoresOnly { .. }) => {
            debug!(
                "corpus {} holds bare scores, label counts unavailable",
                corpus_path.display()
            );
            let scores = corpus::load_scores(&corpus_path)?;
            (CorpusSnapshot::from_scores(scores), BTreeMap::new())
        }
        Err(e) => return Err(e.into()),
    };

    let report = StatsReport {
        corpus_version: snapshot.version,
        corpus_size: snapshot.scores.len(),
        stats: CorpusStats::from_scores(&snapshot.scores),
        cuts: TierCuts::from_scores(&snapshot.scores),
        label_counts,
    };
    let rendered = reporters::stats_report(&report, format)?;
    super::emit(&rendered, output)
}

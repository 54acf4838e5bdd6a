//! Observation corpus: durable log plus immutable snapshots
//!
//! The log is a JSON file of observation records, append-only in
//! spirit: records are added with deduplicated deterministic IDs and
//! the file is rewritten atomically. Scoring never touches the log
//! directly; it takes a [`CorpusSnapshot`], a frozen copy of the score
//! series, so concurrent appends cannot shift statistics mid-batch.
//!
//! Bare JSON score arrays (the shape upstream analyzers export) load
//! read-only through [`load_scores`]; they carry no records to append
//! to or count by label.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::Observation;

/// Default corpus file name, relative to the working directory.
pub const DEFAULT_CORPUS_FILENAME: &str = "observations.json";

/// Errors from corpus storage.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read corpus file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corpus file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode corpus file {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write corpus file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corpus file {path} holds bare scores; full records are required here")]
    ScoresOnly { path: PathBuf },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// On-disk corpus shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Scores(Vec<f64>),
    Records(Vec<Observation>),
}

/// An immutable view of the score corpus at a point in time.
///
/// The version is the record count when the snapshot was taken; for an
/// append-only log it grows monotonically, so equal versions mean
/// identical statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    pub version: u64,
    pub scores: Vec<f64>,
}

impl CorpusSnapshot {
    pub fn from_scores(scores: Vec<f64>) -> Self {
        Self {
            version: scores.len() as u64,
            scores,
        }
    }

    pub fn empty() -> Self {
        Self::from_scores(Vec::new())
    }
}

/// Observation log backed by a JSON file.
#[derive(Debug, Clone)]
pub struct ObservationLog {
    path: PathBuf,
    records: Vec<Observation>,
}

impl ObservationLog {
    /// Open the log at `path`. A missing file (or an empty JSON array)
    /// is an empty log; a file holding bare scores is rejected because
    /// it cannot take records.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        match read_corpus_file(&path)? {
            None => {
                debug!("no corpus file at {}, starting empty", path.display());
                Ok(Self {
                    path,
                    records: Vec::new(),
                })
            }
            Some(CorpusFile::Scores(scores)) if scores.is_empty() => Ok(Self {
                path,
                records: Vec::new(),
            }),
            Some(CorpusFile::Scores(_)) => Err(StoreError::ScoresOnly { path }),
            Some(CorpusFile::Records(records)) => Ok(Self { path, records }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, assigning its deterministic ID and a recording
    /// time if missing. Returns false when a record with the same ID is
    /// already present (the append is dropped).
    pub fn append(&mut self, mut obs: Observation) -> bool {
        obs.ensure_id();
        if self.records.iter().any(|r| r.id == obs.id) {
            debug!("observation {} already recorded, skipping", obs.id);
            return false;
        }
        if obs.recorded_at.is_none() {
            obs.recorded_at = Some(Utc::now());
        }
        self.records.push(obs);
        true
    }

    /// Persist the log. The file is written to a temporary sibling and
    /// renamed over the target, so readers never see a half-written
    /// log.
    pub fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let json =
            serde_json::to_string_pretty(&self.records).map_err(|source| StoreError::Encode {
                path: self.path.clone(),
                source,
            })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Freeze the current score series for scoring.
    pub fn snapshot(&self) -> CorpusSnapshot {
        CorpusSnapshot {
            version: self.records.len() as u64,
            scores: self.records.iter().map(|r| r.risk_score).collect(),
        }
    }

    /// Observation counts per label, sorted by label.
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Score series for a single label.
    pub fn scores_for_label(&self, label: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.label == label)
            .map(|r| r.risk_score)
            .collect()
    }
}

/// Read just the score series from any supported corpus shape. Missing
/// files are an empty corpus; record files contribute their final risk
/// scores.
pub fn load_scores(path: &Path) -> StoreResult<Vec<f64>> {
    match read_corpus_file(path)? {
        None => {
            debug!("no corpus file at {}, treating as empty", path.display());
            Ok(Vec::new())
        }
        Some(CorpusFile::Scores(scores)) => Ok(scores),
        Some(CorpusFile::Records(records)) => {
            Ok(records.iter().map(|r| r.risk_score).collect())
        }
    }
}

fn read_corpus_file(path: &Path) -> StoreResult<Option<CorpusFile>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let file = serde_json::from_str(&data).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(file))
}

//! CLI command definitions and handlers

mod classify;
mod init;
mod score;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::corpus::DEFAULT_CORPUS_FILENAME;
use crate::reporters::OutputFormat;

/// Parse and validate a confidence value (any finite number; nominal
/// range is 0.0 to 1.0 but out-of-range values are allowed through)
fn parse_confidence(s: &str) -> Result<f64, String> {
    let v: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err("confidence must be a finite number".to_string())
    }
}

/// Tiderisk - corpus-relative risk scoring for marine debris detections
#[derive(Parser, Debug)]
#[command(name = "tiderisk")]
#[command(
    version,
    about = "Normalize and classify debris detection risk against your own observation history",
    long_about = "Tiderisk turns raw detector output (label + confidence) into stable \
risk scores: label priors are confidence-adjusted, winsorized against the recorded \
corpus, snapped to quantile bucket midpoints, and classified into five relative \
tiers.\n\n\
Scores are corpus-relative by design: the same detection scores differently as the \
observation history grows.",
    after_help = "\
Examples:
  tiderisk score --label Fish_net --confidence 0.8   Score one detection
  tiderisk score --detections run.json --record      Score a detector run, log the headline
  tiderisk stats                                     Corpus distribution and tier cuts
  tiderisk classify --tier high                      Observations at high tier or above
  tiderisk classify --label Plastic                  One label against its own history
  tiderisk init                                      Write a tiderisk.toml template"
)]
pub struct Cli {
    /// Working directory (config and default corpus location)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a tiderisk.toml config file with example settings
    Init,

    /// Score detections against the observation corpus
    #[command(after_help = "\
Examples:
  tiderisk score --label Fish_net --confidence 0.8       Score one detection
  tiderisk score --detections run.json                   Score a whole detector run
  tiderisk score --detections run.json --record \\
      --image dive_007.jpg --lat 34.76 --lon 128.43      Log the headline observation
  tiderisk score --label Glass --confidence 0.4 -f json  JSON output for scripting")]
    Score {
        /// Debris label to score (pairs with --confidence)
        #[arg(long, requires = "confidence", conflicts_with = "detections")]
        label: Option<String>,

        /// Detector confidence for --label
        #[arg(long, value_parser = parse_confidence, requires = "label")]
        confidence: Option<f64>,

        /// JSON detector run: an array of {label, confidence} objects,
        /// or an object wrapping one under "detections"/"all_detections"
        #[arg(long, conflicts_with_all = ["label", "confidence"])]
        detections: Option<PathBuf>,

        /// Corpus file (observation log or bare score array)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Append the headline observation to the corpus log
        #[arg(long)]
        record: bool,

        /// Source image name stored with --record
        #[arg(long, requires = "record")]
        image: Option<String>,

        /// Latitude stored with --record (pairs with --lon)
        #[arg(long, requires = "lon", requires = "record")]
        lat: Option<f64>,

        /// Longitude stored with --record (pairs with --lat)
        #[arg(long, requires = "lat", requires = "record")]
        lon: Option<f64>,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show corpus distribution statistics and tier cuts
    #[command(after_help = "\
Examples:
  tiderisk stats                                Stats for the default corpus
  tiderisk stats --corpus survey.json           Stats for a specific corpus file
  tiderisk stats -f json                        JSON output for scripting")]
    Stats {
        /// Corpus file (observation log or bare score array)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List recorded observations by risk tier
    #[command(after_help = "\
Examples:
  tiderisk classify                             All observations, highest score first
  tiderisk classify --tier high                 Only high and very-high observations
  tiderisk classify --label Fish_net            One label against its own sub-corpus
  tiderisk classify --label Plastic --tier very-high -f json")]
    Classify {
        /// Classify one label's observations against that label's own
        /// sub-corpus
        #[arg(long)]
        label: Option<String>,

        /// Only show observations at this tier or above
        #[arg(long, value_parser = ["very-low", "low", "medium", "high", "very-high"])]
        tier: Option<String>,

        /// Corpus file (observation log or bare score array)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(&cli.path),

        Commands::Score {
            label,
            confidence,
            detections,
            corpus,
            record,
            image,
            lat,
            lon,
            format,
            output,
        } => score::run(
            &cli.path,
            label,
            confidence,
            detections.as_deref(),
            corpus,
            record,
            image,
            lat,
            lon,
            format.as_deref(),
            output.as_deref(),
        ),

        Commands::Stats {
            corpus,
            format,
            output,
        } => stats::run(&cli.path, corpus, format.as_deref(), output.as_deref()),

        Commands::Classify {
            label,
            tier,
            corpus,
            format,
            output,
        } => classify::run(
            &cli.path,
            label,
            tier.as_deref(),
            corpus,
            format.as_deref(),
            output.as_deref(),
        ),
    }
}

/// Effective output format: flag, then config default, then text.
fn resolve_format(flag: Option<&str>, config: &ProjectConfig) -> Result<OutputFormat> {
    let name = flag
        .map(str::to_string)
        .or_else(|| config.defaults.format.clone())
        .unwrap_or_else(|| "text".to_string());
    name.parse()
}

/// Effective corpus path: flag, then config default (resolved against
/// the working directory), then `observations.json` in the working
/// directory.
fn resolve_corpus(flag: Option<PathBuf>, config: &ProjectConfig, dir: &Path) -> PathBuf {
    flag.or_else(|| {
        config.defaults.corpus.clone().map(|p| {
            if p.is_absolute() {
                p
            } else {
                dir.join(p)
            }
        })
    })
    .unwrap_or_else(|| dir.join(DEFAULT_CORPUS_FILENAME))
}

/// Write a rendered report to a file or stdout.
fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

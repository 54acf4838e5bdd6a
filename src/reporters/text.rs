//! Text (terminal) reporter with colors and formatting

use anyhow::Result;

use super::{tier_hex, ClassifyReport, ScoreReport, StatsReport};
use crate::engine::{ScorePath, ScoredDetection};
use crate::models::Tier;

/// Tier colors (ANSI escape codes)
fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::VeryHigh => "\x1b[31m", // Red
        Tier::High => "\x1b[91m",     // Light red
        Tier::Medium => "\x1b[33m",   // Yellow
        Tier::Low => "\x1b[92m",      // Light green
        Tier::VeryLow => "\x1b[32m",  // Green
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Tier tag
fn tier_tag(tier: Tier) -> &'static str {
    match tier {
        Tier::VeryHigh => "[VH]",
        Tier::High => "[H]",
        Tier::Medium => "[M]",
        Tier::Low => "[L]",
        Tier::VeryLow => "[VL]",
    }
}

/// Render a score report as formatted terminal output
pub fn render_score(report: &ScoreReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Tiderisk Score{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Corpus: v{}  ({} scores)\n\n",
        report.corpus_version, report.corpus_size
    ));

    if let Some(headline) = &report.headline {
        let tier_c = tier_color(headline.tier);
        out.push_str(&format!(
            "Headline: {tier_c}{BOLD}{:.2}{RESET} {tier_c}{}{RESET} {} {DIM}(confidence {:.2}){RESET}\n",
            headline.score,
            tier_tag(headline.tier),
            headline.label,
            headline.confidence
        ));
        out.push_str(&format!("  {DIM}{}{RESET}\n", breakdown(headline)));
        match report.recorded {
            Some(true) => {
                out.push_str(&format!("  {DIM}recorded to observation log{RESET}\n"));
            }
            Some(false) => {
                out.push_str(&format!(
                    "  {DIM}already in observation log, not recorded again{RESET}\n"
                ));
            }
            None => {}
        }
        out.push('\n');
    }

    if !report.detections.is_empty() {
        out.push_str(&format!(
            "{BOLD}DETECTIONS{RESET} ({} total)\n",
            report.detections.len()
        ));
        out.push_str(&format!("{DIM}  #   TIER  SCORE  CONF   LABEL{RESET}\n"));
        out.push_str(&format!(
            "{DIM}  ──────────────────────────────────────────{RESET}\n"
        ));
        for (i, det) in report.detections.iter().enumerate() {
            let tier_c = tier_color(det.tier);
            out.push_str(&format!(
                "  {DIM}{:>3}{RESET}  {tier_c}{:<4}{RESET}  {:>5.2}  {:>5.2}  {}\n",
                i + 1,
                tier_tag(det.tier),
                det.score,
                det.confidence,
                det.label
            ));
        }
        out.push('\n');
    }

    out.push_str(&legend());
    Ok(out)
}

/// Render a stats report as formatted terminal output
pub fn render_stats(report: &StatsReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Tiderisk Corpus{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Corpus: v{}  ({} scores)\n\n",
        report.corpus_version, report.corpus_size
    ));

    match report.stats.populated() {
        None => {
            out.push_str(
                "No finite scores recorded yet. New detections pass through \
                 with a clamp until observations accumulate.\n\n",
            );
        }
        Some(dist) => {
            out.push_str(&format!("{BOLD}DISTRIBUTION{RESET}\n"));
            out.push_str(&format!(
                "  count {}  dropped {}  mean {:.2}  min {:.2}  max {:.2}\n",
                dist.count, dist.dropped, dist.mean, dist.min, dist.max
            ));
            out.push_str(&format!(
                "  winsor bounds [{:.2}, {:.2}]\n",
                dist.winsor_low, dist.winsor_high
            ));
            let bps: Vec<String> = dist
                .breakpoints
                .iter()
                .map(|b| format!("{:.2}", b))
                .collect();
            out.push_str(&format!("  breakpoints {}\n\n", bps.join(" | ")));
        }
    }

    if let Some(cuts) = &report.cuts {
        out.push_str(&format!("{BOLD}TIER CUTS{RESET}\n"));
        out.push_str(&format!(
            "  p20 {:.2}  p40 {:.2}  p60 {:.2}  p80 {:.2}\n\n",
            cuts.p20, cuts.p40, cuts.p60, cuts.p80
        ));
    }

    if !report.label_counts.is_empty() {
        out.push_str(&format!("{BOLD}LABELS{RESET}\n"));
        for (label, count) in &report.label_counts {
            out.push_str(&format!("  {:<16} {:>4}\n", label, count));
        }
        out.push('\n');
    }

    out.push_str(&legend());
    Ok(out)
}

/// Render a classify report as formatted terminal output
pub fn render_classify(report: &ClassifyReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Tiderisk Tiers{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Corpus: v{}  ({} scores)",
        report.corpus_version, report.corpus_size
    ));
    if let Some(label) = &report.label {
        out.push_str(&format!("  label: {label}"));
    }
    if let Some(min) = report.min_tier {
        out.push_str(&format!("  min tier: {min}"));
    }
    out.push_str("\n\n");

    if report.rows.is_empty() {
        out.push_str("No observations match.\n\n");
    } else {
        out.push_str(&format!(
            "{DIM}  #   TIER  SCORE  LABEL            SOURCE{RESET}\n"
        ));
        out.push_str(&format!(
            "{DIM}  ─────────────────────────────────────────────────{RESET}\n"
        ));
        for (i, row) in report.rows.iter().enumerate() {
            let tier_c = tier_color(row.tier);
            let (label, source) = match &row.observation {
                Some(obs) => (
                    obs.label.as_str(),
                    obs.source_image.as_deref().unwrap_or("-"),
                ),
                None => ("-", "-"),
            };
            out.push_str(&format!(
                "  {DIM}{:>3}{RESET}  {tier_c}{:<4}{RESET}  {:>5.2}  {:<16} {DIM}{}{RESET}\n",
                i + 1,
                tier_tag(row.tier),
                row.score,
                label,
                source
            ));
        }
        out.push('\n');
    }

    out.push_str(&legend());
    Ok(out)
}

/// One-line account of how a score was produced
fn breakdown(det: &ScoredDetection) -> String {
    let front = format!(
        "base {:.2} x factor {:.2} = raw {:.2}",
        det.base_risk, det.confidence_factor, det.raw_score
    );
    match (det.path, det.winsorized, det.bucket) {
        (ScorePath::RawClamp, _, _) => {
            format!("{front} -> clamped (empty corpus) -> {:.2}", det.score)
        }
        (ScorePath::BucketMidpoint, Some(w), Some(b)) => format!(
            "{front} -> winsorized {:.2} -> bucket [{:.2}, {:.2}] -> {:.2}",
            w, b.low, b.high, det.score
        ),
        (_, Some(w), _) => format!(
            "{front} -> winsorized {:.2} (no distinct buckets) -> {:.2}",
            w, det.score
        ),
        _ => format!("{front} -> {:.2}", det.score),
    }
}

/// Five-row tier legend with the shared hex palette
fn legend() -> String {
    let mut out = String::new();
    out.push_str(&format!("{BOLD}LEGEND{RESET}\n"));
    for tier in [
        Tier::VeryLow,
        Tier::Low,
        Tier::Medium,
        Tier::High,
        Tier::VeryHigh,
    ] {
        out.push_str(&format!(
            "  {}■{RESET} {:<9} {DIM}{}{RESET}\n",
            tier_color(tier),
            tier.label(),
            tier_hex(tier)
        ));
    }
    out
}

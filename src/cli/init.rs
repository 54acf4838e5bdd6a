//! Init command - write a starter config file

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::CONFIG_FILENAME;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    println!("\n{} Initializing Tiderisk\n", style("🌊").bold());

    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        let default_config = r#"# Tiderisk Configuration

[priors]
# Base risk per debris label, 0.0 to 5.0. Labels not listed here fall
# back to the built-in table, then to `default`.
# default = 3.0
# Fish_net = 4.8
# Drone = 1.5

[defaults]
# Default output format (text, json)
format = "text"

# Corpus file, relative to the working directory
corpus = "observations.json"
"#;
        std::fs::write(&config_path, default_config)
            .with_context(|| "Failed to create config file")?;
        println!(
            "{} Created {}",
            style("✓").green(),
            style(CONFIG_FILENAME).cyan()
        );
    }

    println!("\n{} Ready to score detections!", style("✨").bold());
    println!("\nNext steps:");
    println!(
        "  {} Score a detection",
        style("tiderisk score --label Fish_net --confidence 0.8").cyan()
    );
    println!(
        "  {} Build up the corpus",
        style("tiderisk score --detections run.json --record").cyan()
    );
    println!("  {} Inspect the distribution", style("tiderisk stats").cyan());

    Ok(())
}

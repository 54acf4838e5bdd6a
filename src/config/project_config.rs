//! Project-level configuration support
//!
//! Loads per-project configuration from a `tiderisk.toml` file in the
//! working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # tiderisk.toml
//!
//! [priors]
//! default = 3.0     # fallback for labels with no entry anywhere
//! Fish_net = 4.8    # override a built-in prior
//! Drone = 1.5       # add a prior for a new label
//!
//! [defaults]
//! format = "text"
//! corpus = "observations.json"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::priors::RiskPriorTable;

/// Name of the project config file.
pub const CONFIG_FILENAME: &str = "tiderisk.toml";

/// Project-level configuration loaded from tiderisk.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Base risk prior overrides
    #[serde(default)]
    pub priors: PriorOverrides,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Overrides for the built-in base risk table
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PriorOverrides {
    /// Fallback prior for labels with no entry anywhere
    #[serde(default)]
    pub default: Option<f64>,

    /// Label -> base risk. Overrides built-ins and adds new labels.
    #[serde(flatten)]
    pub labels: HashMap<String, f64>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Default corpus file path
    #[serde(default)]
    pub corpus: Option<PathBuf>,
}

impl ProjectConfig {
    /// Build the effective prior table from this config.
    pub fn prior_table(&self) -> RiskPriorTable {
        RiskPriorTable::with_overrides(self.priors.labels.clone(), self.priors.default)
    }
}

/// Load project configuration from the working directory.
///
/// Returns default configuration if no config file is found; a config
/// file that fails to parse is reported and skipped rather than
/// aborting the run.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(CONFIG_FILENAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        let table = config.prior_table();

        // Built-ins intact, no custom default.
        assert_eq!(table.base_risk("Fish_net"), 4.5);
        assert_eq!(table.base_risk("Styrofoam"), 3.0);
        assert!(config.defaults.format.is_none());
        assert!(config.defaults.corpus.is_none());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
[priors]
default = 2.0
Fish_net = 4.8
Drone = 1.5

[defaults]
format = "json"
corpus = "data/observations.json"
"#;

        let config: ProjectConfig = toml::from_str(toml_content).unwrap();
        let table = config.prior_table();

        assert_eq!(table.base_risk("Fish_net"), 4.8);
        assert_eq!(table.base_risk("Drone"), 1.5);
        assert_eq!(table.base_risk("Wood"), 2.8); // built-in untouched
        assert_eq!(table.base_risk("Styrofoam"), 2.0); // custom default

        assert_eq!(config.defaults.format.as_deref(), Some("json"));
        assert_eq!(
            config.defaults.corpus.as_deref(),
            Some(Path::new("data/observations.json"))
        );
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(dir.path());
        assert!(config.priors.labels.is_empty());
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "priors = not toml [").unwrap();
        let config = load_project_config(dir.path());
        assert!(config.priors.labels.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let config: ProjectConfig = toml::from_str("[priors]\nGlass = 4.1\n").unwrap();
        let table = config.prior_table();
        assert_eq!(table.base_risk("Glass"), 4.1);
        assert_eq!(table.base_risk("Styrofoam"), 3.0); // standard default kept
    }
}

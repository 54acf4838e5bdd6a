//! Configuration module for Tiderisk
//!
//! This module handles:
//! - Project-level configuration (tiderisk.toml)
//! - Base risk prior overrides
//! - CLI defaults

mod project_config;

pub use project_config::{load_project_config, CliDefaults, PriorOverrides, ProjectConfig, CONFIG_FILENAME};

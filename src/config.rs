//! Configuration file support for ce-tree.
//!
//! Provides YAML-based configuration through `ce-tree.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::cli::TreeDepth;
use ce_component_tree::shared::security::{read_regular_file, MAX_FILE_SIZE};
use ce_component_tree::shared::Result;

pub const CONFIG_FILENAME: &str = "ce-tree.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Print only the components that changed
    pub changed_only: Option<bool>,
    /// Report the time spent in each visitor
    pub compute_durations: Option<bool>,
    /// Deepest component type printed: PROJECT, DIRECTORY or FILE
    pub depth: Option<String>,
    /// Path of the project inside its SCM repository
    pub scm_base_path: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Parsed `depth`; only meaningful after validation
    pub fn tree_depth(&self) -> Option<TreeDepth> {
        self.depth
            .as_deref()
            .and_then(|depth| TreeDepth::from_str(depth).ok())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_regular_file(path, "config file", MAX_FILE_SIZE).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref depth) = config.depth {
        if let Err(e) = TreeDepth::from_str(depth) {
            bail!(
                "Invalid config: {}\n\n\
                 💡 Hint: 'depth' must be one of PROJECT, DIRECTORY or FILE.",
                e
            );
        }
    }
    if let Some(ref scm_base_path) = config.scm_base_path {
        if scm_base_path.starts_with('/') {
            bail!(
                "Invalid config: scm_base_path '{}' must be relative to the SCM root.",
                scm_base_path
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "Unknown config field will be ignored");
    }
}

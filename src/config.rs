// ABOUTME: Diff configuration loaded from an optional TOML file
// ABOUTME: Holds the schema, object kinds, and emitter options; CLI flags override it

use crate::diff::{ChangeOptions, SchemaKind};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings for a diff run
///
/// Every field has a default, so an empty file (or no file) is a valid configuration:
///
/// ```toml
/// schema = "public"
/// kinds = ["table", "column"]
/// varchar_fallback_length = 1024
/// drop_orphaned_defaults = false
/// channel_capacity = 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Schema compared on both sides
    pub schema: String,
    /// Object kinds to compare; always run in table-then-column order
    pub kinds: Vec<SchemaKind>,
    /// Length declared for varchar columns without a maximum length
    pub varchar_fallback_length: u32,
    /// Emit DROP DEFAULT when only the target has a column default
    pub drop_orphaned_defaults: bool,
    /// Rows buffered per stream between a query and the merge
    pub channel_capacity: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        let change = ChangeOptions::default();
        Self {
            schema: "public".to_string(),
            kinds: SchemaKind::ALL.to_vec(),
            varchar_fallback_length: change.varchar_fallback_length,
            drop_orphaned_defaults: change.drop_orphaned_defaults,
            channel_capacity: 256,
        }
    }
}

impl DiffConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DiffConfig =
            toml::from_str(contents).context("Failed to parse diff configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn change_options(&self) -> ChangeOptions {
        ChangeOptions {
            varchar_fallback_length: self.varchar_fallback_length,
            drop_orphaned_defaults: self.drop_orphaned_defaults,
            ..ChangeOptions::default()
        }
    }

    /// Requested kinds, deduplicated and in execution order
    pub fn ordered_kinds(&self) -> Vec<SchemaKind> {
        let mut kinds = self.kinds.clone();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema.trim().is_empty() {
            bail!("Configuration error: schema cannot be empty");
        }
        if self.kinds.is_empty() {
            bail!("Configuration error: at least one object kind must be compared");
        }
        if self.varchar_fallback_length == 0 {
            bail!("Configuration error: varchar_fallback_length must be greater than zero");
        }
        if self.channel_capacity == 0 {
            bail!("Configuration error: channel_capacity must be greater than zero");
        }
        Ok(())
    }
}

/// Load a [`DiffConfig`] from a TOML file
pub fn load_diff_config_from_file(path: impl AsRef<Path>) -> Result<DiffConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    DiffConfig::from_toml_str(&contents)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use automate_config::AutomateConfig;
use automate_core::SchemaSnapshot;
use automate_loader::{load_config_from_path, load_config_or_default, load_schema, select_tables};

/// Load the given config file, or `automate.json` in the current directory
/// falling back to defaults.
pub fn resolve_config(path: Option<PathBuf>) -> Result<AutomateConfig> {
    match path {
        Some(path) => load_config_from_path(path),
        None => load_config_or_default(None),
    }
}

/// Load the configured schema snapshot and apply the table filters.
pub fn load_snapshot(config: &AutomateConfig) -> Result<SchemaSnapshot> {
    let snapshot = load_schema(&config.schema)?;
    select_tables(
        snapshot,
        config.tables.as_deref(),
        config.skip_tables.as_deref(),
    )
    .with_context(|| format!("filter tables of {}", config.schema.display()))
}

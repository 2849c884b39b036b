use std::path::PathBuf;

use anyhow::{Context, Result};
use automate::Automate;
use colored::Colorize;
use serde_json::json;

use crate::utils::{load_snapshot, resolve_config};

pub fn cmd_definitions(config: Option<PathBuf>, schema: Option<PathBuf>) -> Result<()> {
    let mut config = resolve_config(config)?;
    if let Some(schema) = schema {
        config.schema = schema;
    }
    let snapshot = load_snapshot(&config)?;
    let automate = Automate::from_config(&config, &snapshot)?;
    let (definitions, failures) = automate.definitions(&snapshot);

    for failure in &failures {
        eprintln!(
            "{} {}: {}",
            "Failed".bright_red(),
            failure.table.bright_cyan().bold(),
            failure.error
        );
    }

    let output = json!({ "definitions": definitions, "failures": failures });
    let text = serde_json::to_string_pretty(&output).context("serialize definitions")?;
    println!("{}", text);
    Ok(())
}

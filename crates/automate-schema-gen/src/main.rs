use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use automate_config::AutomateConfig;
use automate_core::SchemaSnapshot;
use clap::Parser;
use schemars::{Schema, schema_for};

#[derive(Debug, Parser)]
#[command(
    name = "automate-schema-gen",
    about = "Emit JSON Schemas for automate schema snapshots and configuration."
)]
struct Args {
    /// Output directory for schema files.
    #[arg(short = 'o', long = "out", default_value = "schemas")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    run(args.out)
}

fn run(out: PathBuf) -> Result<()> {
    if !out.exists() {
        fs::create_dir_all(&out).with_context(|| format!("create dir {}", out.display()))?;
    }

    let written = [
        write_schema(&out, "snapshot.schema.json", &schema_for!(SchemaSnapshot))?,
        write_schema(&out, "config.schema.json", &schema_for!(AutomateConfig))?,
    ];

    println!("Wrote schemas:");
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn write_schema(out: &Path, file_name: &str, schema: &Schema) -> Result<PathBuf> {
    let path = out.join(file_name);
    let text = serde_json::to_string_pretty(schema)
        .with_context(|| format!("serialize {}", file_name))?;
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

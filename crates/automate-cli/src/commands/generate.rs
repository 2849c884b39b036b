use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use automate::{ArtifactKind, Automate, AutomateConfig, GeneratedArtifact, GenerationReport};
use clap::Args;
use colored::Colorize;
use futures::future::try_join_all;
use tokio::fs;

use crate::utils::{load_snapshot, resolve_config};

/// Overrides applied on top of automate.json.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Output type: js, ts, egg, midway or @ali/midway.
    #[arg(short = 't', long = "type")]
    pub output_type: Option<String>,
    /// Directory for model files.
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,
    /// Directory for definition files.
    #[arg(long = "types-dir")]
    pub types_dir: Option<PathBuf>,
    /// Schema snapshot to read.
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,
    /// Path to automate.json.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Empty the output directories before writing.
    #[arg(long = "empty-dir")]
    pub empty_dir: bool,
}

impl GenerateArgs {
    fn apply(self, config: &mut AutomateConfig) {
        if let Some(output_type) = self.output_type {
            config.r#type = output_type;
        }
        if let Some(dir) = self.dir {
            config.dir = dir;
        }
        if let Some(types_dir) = self.types_dir {
            config.types_dir = Some(types_dir);
        }
        if let Some(schema) = self.schema {
            config.schema = schema;
        }
        config.empty_dir |= self.empty_dir;
    }
}

pub async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut config = resolve_config(args.config.clone())?;
    args.apply(&mut config);

    let snapshot = load_snapshot(&config)?;
    let automate = Automate::from_config(&config, &snapshot)?;
    let report = automate.generate(&snapshot)?;

    let models_dir = config.models_dir().to_path_buf();
    let types_dir = config.types_dir().to_path_buf();

    if config.empty_dir {
        empty_dir(&models_dir).await?;
        if types_dir != models_dir {
            empty_dir(&types_dir).await?;
        }
    }

    write_artifacts(&report.artifacts, &models_dir, &types_dir).await?;
    print_summary(&report);
    Ok(())
}

fn output_path(artifact: &GeneratedArtifact, models_dir: &Path, types_dir: &Path) -> PathBuf {
    let root = match artifact.artifact_kind {
        ArtifactKind::Model => models_dir,
        ArtifactKind::Definition => types_dir,
    };
    root.join(&artifact.relative_path)
}

async fn write_artifacts(
    artifacts: &[GeneratedArtifact],
    models_dir: &Path,
    types_dir: &Path,
) -> Result<()> {
    let write_futures: Vec<_> = artifacts
        .iter()
        .map(|artifact| {
            let out_path = output_path(artifact, models_dir, types_dir);
            async move {
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("create parent dir {}", parent.display()))?;
                }
                fs::write(&out_path, &artifact.source_text)
                    .await
                    .with_context(|| format!("write {}", out_path.display()))?;
                println!(
                    "{} {}",
                    "Generated".bright_green(),
                    out_path.display().to_string().bright_cyan()
                );
                Ok::<(), anyhow::Error>(())
            }
        })
        .collect();

    try_join_all(write_futures).await?;
    Ok(())
}

/// Remove everything inside `dir`, keeping the directory itself.
async fn empty_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("read dir {}", dir.display()))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push(entry.path());
    }

    let remove_futures: Vec<_> = paths
        .into_iter()
        .map(|path| async move {
            if path.is_dir() {
                fs::remove_dir_all(&path)
                    .await
                    .with_context(|| format!("remove dir {}", path.display()))
            } else {
                fs::remove_file(&path)
                    .await
                    .with_context(|| format!("remove file {}", path.display()))
            }
        })
        .collect();

    try_join_all(remove_futures).await?;
    tracing::debug!(dir = %dir.display(), "emptied output directory");
    Ok(())
}

fn print_summary(report: &GenerationReport) {
    for diagnostic in &report.diagnostics {
        eprintln!("{} {}", "Warning".bright_yellow(), diagnostic);
    }
    for failure in &report.failures {
        eprintln!(
            "{} {}: {}",
            "Failed".bright_red(),
            failure.table.bright_cyan().bold(),
            failure.error
        );
    }
    println!(
        "{} {} {}",
        "Done:".bright_white(),
        report.artifacts.len().to_string().bright_yellow().bold(),
        "file(s) generated".bright_white()
    );
}

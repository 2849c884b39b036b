use std::path::PathBuf;

use serde::Serialize;

/// Destination class of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Model source, written to the model directory.
    Model,
    /// Type declarations, written to the types directory.
    Definition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub relative_path: PathBuf,
    pub source_text: String,
    pub artifact_kind: ArtifactKind,
}

impl GeneratedArtifact {
    pub fn new(relative_path: impl Into<PathBuf>, source_text: String, artifact_kind: ArtifactKind) -> Self {
        Self {
            relative_path: relative_path.into(),
            source_text,
            artifact_kind,
        }
    }
}

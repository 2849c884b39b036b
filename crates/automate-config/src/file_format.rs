use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported file formats for schema snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Json,
    Yaml,
    Yml,
}

impl FileFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(FileFormat::Json),
            Some("yaml") => Some(FileFormat::Yaml),
            Some("yml") => Some(FileFormat::Yml),
            _ => None,
        }
    }

    pub fn is_yaml(self) -> bool {
        matches!(self, FileFormat::Yaml | FileFormat::Yml)
    }
}

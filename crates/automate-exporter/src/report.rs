use std::fmt;

use automate_core::GeneratedArtifact;
use serde::Serialize;

/// A non-fatal event recorded while synthesizing a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A rewrite rule or rename placeholder had nothing to anchor on; the
    /// template text was left as is.
    #[serde(rename_all = "camelCase")]
    AnchorNotFound {
        table: Option<String>,
        artifact: String,
        anchor: String,
    },
    /// The column type is not in the normalizer's table.
    #[serde(rename_all = "camelCase")]
    UnrecognizedColumnType {
        table: String,
        attribute: String,
        raw_type: String,
    },
    /// An expression default could not be parsed and was emitted as text.
    #[serde(rename_all = "camelCase")]
    UnparsableDefaultExpression {
        table: String,
        attribute: String,
        expression: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AnchorNotFound {
                table: Some(table),
                artifact,
                anchor,
            } => write!(f, "{}: anchor `{}` not found in {}", table, anchor, artifact),
            Diagnostic::AnchorNotFound {
                table: None,
                artifact,
                anchor,
            } => write!(f, "anchor `{}` not found in {}", anchor, artifact),
            Diagnostic::UnrecognizedColumnType {
                table,
                attribute,
                raw_type,
            } => write!(
                f,
                "{}.{}: unrecognized column type `{}`",
                table, attribute, raw_type
            ),
            Diagnostic::UnparsableDefaultExpression {
                table,
                attribute,
                expression,
            } => write!(
                f,
                "{}.{}: default `{}` is not a valid expression, emitted as a string",
                table, attribute, expression
            ),
        }
    }
}

/// A table that produced no artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFailure {
    pub table: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub artifacts: Vec<GeneratedArtifact>,
    pub failures: Vec<TableFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.diagnostics.is_empty()
    }

    pub fn artifact(&self, relative_path: &str) -> Option<&GeneratedArtifact> {
        self.artifacts
            .iter()
            .find(|a| a.relative_path.as_os_str() == relative_path)
    }
}

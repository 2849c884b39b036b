//! Renders model definitions into Sequelize model sources.
//!
//! Each output dialect has its own built-in templates (see [`dialect`]); the
//! [`Synthesizer`] parses them once and splices every table's definition into
//! them through rewrite rules and scope-aware renames.

pub mod dialect;
pub mod encode;
pub mod error;
pub mod report;
pub mod rules;
pub mod synthesizer;

pub use dialect::{driver, DialectDriver, TemplateId};
pub use error::ExportError;
pub use report::{Diagnostic, GenerationReport, TableFailure};
pub use synthesizer::{generate, Synthesizer, TableOutput};

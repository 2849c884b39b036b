use thiserror::Error;

/// A template or expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// A rename that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("`{0}` is never declared")]
    Undeclared(String),
    #[error("`{to}` is already bound where `{from}` would be renamed")]
    Collision { from: String, to: String },
}

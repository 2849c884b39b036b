//! Lexer for the template subset of JavaScript/TypeScript.

pub mod scanner;
pub mod token;

pub use scanner::*;
pub use token::*;

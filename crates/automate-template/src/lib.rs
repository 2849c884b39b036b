//! Front end for the JavaScript/TypeScript model templates.
//!
//! Templates are parsed once into an immutable [`ast::Module`], rewritten by
//! [`fold::fold_module`] and [`rename::rename`], and printed back with
//! [`printer::print_module`].

pub mod ast;
pub mod error;
pub mod fold;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod rename;

pub use error::{ParseError, RenameError};
pub use fold::{fold_module, FoldOutcome, Rule};
pub use parser::{parse_expression, parse_module};
pub use printer::{print_expr, print_module, print_type, quote};
pub use rename::rename;

//! Naming conventions and helpers for automate code generation.
//!
//! Every name that ends up in generated code (attribute keys, model names,
//! file names, exported identifiers) is derived here so the assembler and the
//! synthesizer agree on one convention per run.

use heck::{ToLowerCamelCase, ToUpperCamelCase};

// ============================================================================
// Model Naming (for the definition assembler)
// ============================================================================

/// Generated key for a column, optionally camel-cased.
///
/// # Examples
/// ```
/// use automate_naming::field_name;
///
/// assert_eq!(field_name("created_at", false), "created_at");
/// assert_eq!(field_name("created_at", true), "createdAt");
/// ```
pub fn field_name(column: &str, camel_case: bool) -> String {
    if camel_case {
        to_camel_case(column)
    } else {
        column.to_string()
    }
}

/// Model name registered for a table.
///
/// Camel-cased names get a `Model` suffix, raw names get `_model`. The suffix
/// is dropped entirely when `omit_suffix` is set.
///
/// # Examples
/// ```
/// use automate_naming::model_name;
///
/// assert_eq!(model_name("user_post", false, false), "user_post_model");
/// assert_eq!(model_name("user_post", true, false), "userPostModel");
/// assert_eq!(model_name("user_post", true, true), "userPost");
/// ```
pub fn model_name(table: &str, camel_case: bool, omit_suffix: bool) -> String {
    let base = field_name(table, camel_case);
    if omit_suffix {
        base
    } else if camel_case {
        format!("{}Model", base)
    } else {
        format!("{}_model", base)
    }
}

/// File stem used for a table's artifacts.
pub fn file_name(table: &str, camel_case: bool) -> String {
    field_name(table, camel_case)
}

/// Identifier bound to the model inside generated code (`UserPostModel`).
pub fn model_identifier(model_name: &str) -> String {
    to_pascal_case(model_name)
}

/// Prefix for the interfaces of a definition artifact (`IUserPost`).
pub fn definition_prefix(table: &str) -> String {
    format!("I{}", to_pascal_case(table))
}

/// Convert to camelCase.
///
/// # Examples
/// ```
/// use automate_naming::to_camel_case;
///
/// assert_eq!(to_camel_case("user_post"), "userPost");
/// assert_eq!(to_camel_case("UserPost"), "userPost");
/// ```
pub fn to_camel_case(s: &str) -> String {
    s.to_lower_camel_case()
}

/// Convert to PascalCase.
///
/// # Examples
/// ```
/// use automate_naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user_post_model"), "UserPostModel");
/// assert_eq!(to_pascal_case("userPostModel"), "UserPostModel");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.to_upper_camel_case()
}

// ============================================================================
// Identifier Rules (for the template printer)
// ============================================================================

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Whether `name` is syntactically an IdentifierName.
///
/// Reserved words pass: they are legal as property keys.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '$' || c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '$' || c == '_' || c.is_alphanumeric())
}

/// Whether `name` is a reserved word and cannot be used as a binding.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Whether `name` can be used as a binding identifier.
pub fn is_binding_identifier(name: &str) -> bool {
    is_identifier_name(name) && !is_reserved_word(name)
}

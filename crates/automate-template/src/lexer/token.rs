//! Lexer token types

/// Token kinds.
///
/// Keywords are not distinguished from identifiers: most of them are
/// contextual in TypeScript, so the parser checks the word text instead.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Word(String),
    String(String),
    /// Numeric literal, kept in its source spelling.
    Number(String),

    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    Question,
    Arrow,
    Assign,

    /// Any other operator (`+`, `===`, `&&`, `|`, ...).
    Punct(String),

    Eof,
    Error(String),
}

/// Source location of a token's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// A comment, without its `//` or `/* */` delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Line,
            text: text.into(),
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Block,
            text: text.into(),
        }
    }
}

/// A token with its kind, location and the trivia in front of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Comments between the previous token and this one.
    pub comments: Vec<Comment>,
    /// A line break precedes this token.
    pub newline_before: bool,
    /// An empty line precedes this token.
    pub blank_line_before: bool,
}

impl Token {
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w == word)
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(&self.kind, TokenKind::Punct(p) if p == punct)
    }
}

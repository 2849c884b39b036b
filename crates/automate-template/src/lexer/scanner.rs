//! Lexer implementation

use std::iter::Peekable;
use std::str::CharIndices;

use super::token::*;

/// Multi-character operators, longest first.
const OPERATORS: &[&str] = &[
    "===", "!==", "**=", "&&=", "||=", "??=", "==", "!=", "<=", ">=", "&&", "||", "??", "**", "++",
    "--", "+=", "-=", "*=", "/=", "%=",
];

/// Lexer for JavaScript/TypeScript template sources.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
        }
    }

    /// Tokenize the entire source. Lexical errors become
    /// [`TokenKind::Error`] tokens for the parser to report.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        let trivia = self.skip_trivia();

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                ';' => self.single(TokenKind::Semi),
                ',' => self.single(TokenKind::Comma),
                ':' => self.single(TokenKind::Colon),
                '?' if self.peek_next_char() != Some('?') => self.single(TokenKind::Question),
                '.' => {
                    if self.source[self.pos..].starts_with("...") {
                        self.advance();
                        self.advance();
                        self.advance();
                        TokenKind::Ellipsis
                    } else if self.peek_next_char().is_some_and(|c| c.is_ascii_digit()) {
                        self.scan_number()
                    } else {
                        self.single(TokenKind::Dot)
                    }
                }
                '=' if self.source[self.pos..].starts_with("=>") => {
                    self.advance();
                    self.advance();
                    TokenKind::Arrow
                }
                '=' if !self.source[self.pos..].starts_with("==") => self.single(TokenKind::Assign),
                '"' | '\'' => self.scan_string(c),
                '`' => {
                    self.advance();
                    TokenKind::Error("template literals are not supported".to_string())
                }
                c if c.is_ascii_digit() => self.scan_number(),
                c if is_word_start(c) => self.scan_word(),
                _ => self.scan_operator(),
            },
        };

        Token {
            kind,
            span: Span {
                start: start_pos,
                end: self.pos,
                line: start_line,
                column: start_col,
            },
            comments: trivia.comments,
            newline_before: trivia.newlines > 0,
            blank_line_before: trivia.blank_line,
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if is_word_part(c) {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Word(self.source[start..self.pos].to_string())
    }

    fn scan_operator(&mut self) -> TokenKind {
        let rest = &self.source[self.pos..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            for _ in 0..op.len() {
                self.advance();
            }
            return TokenKind::Punct((*op).to_string());
        }

        match self.advance() {
            Some(c) if "+-*/%<>!~&|^?@#".contains(c) => TokenKind::Punct(c.to_string()),
            Some(c) => TokenKind::Error(format!("Unexpected character: {}", c)),
            None => TokenKind::Eof,
        }
    }

    /// Scan a quoted string, decoding escape sequences.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                None | Some('\n') => return TokenKind::Error("Unterminated string".to_string()),
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    None => return TokenKind::Error("Unterminated string".to_string()),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('b') => value.push('\u{8}'),
                    Some('f') => value.push('\u{c}'),
                    Some('v') => value.push('\u{b}'),
                    Some('0') => value.push('\0'),
                    Some('\n') => {
                        self.line += 1;
                        self.column = 1;
                    }
                    Some('x') => match self.scan_hex_escape(2) {
                        Some(c) => value.push(c),
                        None => return TokenKind::Error("Invalid hex escape".to_string()),
                    },
                    Some('u') => match self.scan_unicode_escape() {
                        Some(c) => value.push(c),
                        None => return TokenKind::Error("Invalid unicode escape".to_string()),
                    },
                    Some(other) => value.push(other),
                },
                Some(c) => value.push(c),
            }
        }

        TokenKind::String(value)
    }

    fn scan_hex_escape(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            code = code * 16 + self.advance()?.to_digit(16)?;
        }
        char::from_u32(code)
    }

    fn scan_unicode_escape(&mut self) -> Option<char> {
        if self.peek_char() != Some('{') {
            return self.scan_hex_escape(4);
        }
        self.advance();
        let mut code = 0u32;
        loop {
            match self.advance()? {
                '}' => break,
                c => code = code.checked_mul(16)?.checked_add(c.to_digit(16)?)?,
            }
        }
        char::from_u32(code)
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        if self.source[self.pos..].starts_with("0x") || self.source[self.pos..].starts_with("0X") {
            self.advance();
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                self.advance();
            }
        } else {
            while self
                .peek_char()
                .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '_')
            {
                self.advance();
            }
            if matches!(self.peek_char(), Some('e') | Some('E')) {
                self.advance();
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.advance();
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        if self.peek_char().is_some_and(is_word_start) {
            self.scan_word();
            let text = &self.source[start..self.pos];
            return TokenKind::Error(format!("Invalid number: {}", text));
        }

        TokenKind::Number(self.source[start..self.pos].to_string())
    }

    /// Skip whitespace and comments, collecting the comments.
    fn skip_trivia(&mut self) -> Trivia {
        let mut trivia = Trivia::default();
        // line breaks in the current whitespace run
        let mut run = 0usize;

        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\r') | Some('\u{feff}') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                    run += 1;
                    trivia.newlines += 1;
                    if run >= 2 {
                        trivia.blank_line = true;
                    }
                }
                Some('/') if self.peek_next_char() == Some('/') => {
                    self.advance();
                    self.advance();
                    let start = self.pos;
                    while self.peek_char().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                    trivia
                        .comments
                        .push(Comment::line(self.source[start..self.pos].trim_end()));
                    run = 0;
                }
                Some('/') if self.peek_next_char() == Some('*') => {
                    self.advance();
                    self.advance();
                    let start = self.pos;
                    let mut end = self.source.len();
                    loop {
                        match self.peek_char() {
                            None => break,
                            Some('*') if self.peek_next_char() == Some('/') => {
                                end = self.pos;
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some('\n') => {
                                self.advance();
                                self.line += 1;
                                self.column = 1;
                                trivia.newlines += 1;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                    trivia.comments.push(Comment::block(&self.source[start..end]));
                    run = 0;
                }
                _ => break,
            }
        }

        trivia
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((i, c)) = self.chars.next() {
            self.pos = i + c.len_utf8();
            self.column += 1;
            Some(c)
        } else {
            None
        }
    }
}

#[derive(Default)]
struct Trivia {
    comments: Vec<Comment>,
    newlines: usize,
    blank_line: bool,
}

fn is_word_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_word_part(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphanumeric()
}

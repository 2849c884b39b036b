//! Recursive-descent parser producing [`crate::ast`] trees.

mod expr;
mod types;

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::*;

/// Parse a whole template module.
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let mut parser = Parser::new(Lexer::new(source).tokenize())?;
    parser.parse_module()
}

/// Parse a single expression, such as a default value or a raw column type.
///
/// A trailing semicolon is allowed; anything after it is an error.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(Lexer::new(source).tokenize())?;
    let expr = parser.parse_expression()?;
    parser.eat(&TokenKind::Semi);
    if !parser.is_at_end() {
        return Err(parser.error("Unexpected token after expression"));
    }
    Ok(expr)
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Fails on the first lexical error.
    pub(crate) fn new(tokens: Vec<Token>) -> Result<Self, ParseError> {
        if let Some(token) = tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Error(_)))
        {
            let message = match &token.kind {
                TokenKind::Error(msg) => format!("Lexer error: {}", msg),
                _ => "Lexer error".to_string(),
            };
            return Err(ParseError {
                message,
                line: token.span.line,
                column: token.span.column,
            });
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn parse_module(&mut self) -> Result<Module, ParseError> {
        let mut items = Vec::new();
        while !self.is_at_end() {
            items.push(self.parse_item()?);
        }
        Ok(Module { items })
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        let token = self.current();
        let comments = token.comments.clone();
        let blank_line_before = token.blank_line_before;
        let stmt = self.parse_statement()?;
        Ok(Item {
            comments,
            blank_line_before,
            stmt,
        })
    }

    /// `{ items }`
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Item>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.error("Unterminated block"));
            }
            items.push(self.parse_item()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(items)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let word = match &self.current().kind {
            TokenKind::Word(w) => w.clone(),
            _ => return self.parse_expression_statement(),
        };

        match word.as_str() {
            "import" if !self.peek_is(1, &TokenKind::LParen) => {
                self.parse_import().map(Stmt::Import)
            }
            "export" => self.parse_export(),
            "const" | "let" | "var" => {
                let decl = self.parse_var_decl()?;
                self.consume_semicolon()?;
                Ok(Stmt::Var(decl))
            }
            "function" => self.parse_function().map(Stmt::Function),
            "async" if self.peek_word(1, "function") => self.parse_function().map(Stmt::Function),
            "return" => {
                self.advance();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                Ok(Stmt::Return(value))
            }
            "interface" if self.peek_is_word(1) => self.parse_interface().map(Stmt::Interface),
            "type" if self.peek_is_word(1) && self.peek_is(2, &TokenKind::Assign) => {
                self.parse_type_alias().map(Stmt::TypeAlias)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_import(&mut self) -> Result<ImportDecl, ParseError> {
        self.expect_word("import")?;

        let mut import = ImportDecl {
            type_only: false,
            default: None,
            namespace: None,
            named: Vec::new(),
            source: String::new(),
        };

        if let TokenKind::String(source) = &self.current().kind {
            import.source = source.clone();
            self.advance();
            self.consume_semicolon()?;
            return Ok(import);
        }

        if self.check_word("type")
            && (self.peek_is(1, &TokenKind::LBrace)
                || (self.peek_is_word(1) && !self.peek_word(1, "from")))
        {
            self.advance();
            import.type_only = true;
        }

        if matches!(self.current().kind, TokenKind::Word(_)) {
            import.default = Some(self.expect_ident()?);
            if !self.eat(&TokenKind::Comma) {
                return self.finish_import(import);
            }
        }

        if self.current().is_punct("*") {
            self.advance();
            self.expect_word("as")?;
            import.namespace = Some(self.expect_ident()?);
        } else if self.eat(&TokenKind::LBrace) {
            while !self.eat(&TokenKind::RBrace) {
                let imported = self.expect_name()?;
                let local = if self.eat_word("as") {
                    self.expect_ident()?
                } else {
                    imported.clone()
                };
                import.named.push(ImportSpecifier { imported, local });
                if !self.check(&TokenKind::RBrace) {
                    self.expect(TokenKind::Comma)?;
                }
            }
        }

        self.finish_import(import)
    }

    fn finish_import(&mut self, mut import: ImportDecl) -> Result<ImportDecl, ParseError> {
        self.expect_word("from")?;
        import.source = self.expect_string()?;
        self.consume_semicolon()?;
        Ok(import)
    }

    fn parse_export(&mut self) -> Result<Stmt, ParseError> {
        self.expect_word("export")?;

        if self.eat_word("default") {
            if self.check_word("function")
                || (self.check_word("async") && self.peek_word(1, "function"))
            {
                return Ok(Stmt::ExportDefault(ExportDefault::Function(
                    self.parse_function()?,
                )));
            }
            let expr = self.parse_expression()?;
            self.consume_semicolon()?;
            return Ok(Stmt::ExportDefault(ExportDefault::Expr(expr)));
        }

        let stmt = self.parse_statement()?;
        match stmt {
            Stmt::Var(_) | Stmt::Function(_) | Stmt::Interface(_) | Stmt::TypeAlias(_) => {
                Ok(Stmt::Export(Box::new(stmt)))
            }
            _ => Err(self.error("Expected declaration after export")),
        }
    }

    pub(crate) fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let kind = match self.expect_name()?.as_str() {
            "const" => VarKind::Const,
            "let" => VarKind::Let,
            _ => VarKind::Var,
        };

        let mut declarators = Vec::new();
        loop {
            let pat = self.parse_binding_pattern()?;
            let type_ann = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            let init = if self.eat(&TokenKind::Assign) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            declarators.push(Declarator {
                pat,
                type_ann,
                init,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(VarDecl { kind, declarators })
    }

    /// `[async] function [name](params)[: T] { body }`
    pub(crate) fn parse_function(&mut self) -> Result<Function, ParseError> {
        let is_async = self.eat_word("async");
        self.expect_word("function")?;
        let name = if matches!(self.current().kind, TokenKind::Word(_)) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let return_type = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Function {
            name,
            is_async,
            params,
            return_type,
            body,
        })
    }

    fn parse_interface(&mut self) -> Result<InterfaceDecl, ParseError> {
        self.expect_word("interface")?;
        let name = self.expect_ident()?;
        let mut extends = Vec::new();
        if self.eat_word("extends") {
            loop {
                extends.push(self.parse_type_reference()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let body = self.parse_type_members()?;
        Ok(InterfaceDecl {
            name,
            extends,
            body,
        })
    }

    fn parse_type_alias(&mut self) -> Result<TypeAlias, ParseError> {
        self.expect_word("type")?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let ty = self.parse_type()?;
        self.consume_semicolon()?;
        Ok(TypeAlias { name, ty })
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Token `offset` positions ahead, clamped to the trailing EOF.
    pub(crate) fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    pub(crate) fn peek_is(&self, offset: usize, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek(offset).kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn peek_is_word(&self, offset: usize) -> bool {
        matches!(self.peek(offset).kind, TokenKind::Word(_))
    }

    pub(crate) fn peek_word(&self, offset: usize, word: &str) -> bool {
        self.peek(offset).is_word(word)
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_is(0, kind)
    }

    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.current().is_word(word)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(&format!("Expected {:?}", kind)))
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.error(&format!("Expected '{}'", word)))
        }
    }

    /// Any word, including reserved ones (property and member names).
    pub(crate) fn expect_name(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Word(w) => {
                let w = w.clone();
                self.advance();
                Ok(w)
            }
            _ => Err(self.error("Expected name")),
        }
    }

    /// A word usable as a binding.
    pub(crate) fn expect_ident(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Word(w) if !automate_naming::is_reserved_word(w) => {
                let w = w.clone();
                self.advance();
                Ok(w)
            }
            TokenKind::Word(w) => Err(self.error(&format!("Unexpected reserved word '{}'", w))),
            _ => Err(self.error("Expected identifier")),
        }
    }

    pub(crate) fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.error("Expected string")),
        }
    }

    fn at_statement_end(&self) -> bool {
        let token = self.current();
        matches!(
            token.kind,
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        ) || token.newline_before
    }

    /// Explicit `;`, or an automatically inserted one before a line break,
    /// a closing brace or the end of input.
    pub(crate) fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat(&TokenKind::Semi) || self.at_statement_end() {
            Ok(())
        } else {
            Err(self.error("Expected ';'"))
        }
    }

    pub(crate) fn error(&self, msg: &str) -> ParseError {
        let span = self.current().span;
        ParseError {
            message: msg.to_string(),
            line: span.line,
            column: span.column,
        }
    }
}

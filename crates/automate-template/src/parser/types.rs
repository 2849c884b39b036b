//! Type annotations, binding patterns and parameter lists.

use super::Parser;
use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_type(&mut self) -> Result<TsType, ParseError> {
        // leading `|` / `&` is allowed before the first constituent
        if self.current().is_punct("|") || self.current().is_punct("&") {
            self.advance();
        }
        let first = self.parse_intersection_type()?;
        if !self.current().is_punct("|") {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.current().is_punct("|") {
            self.advance();
            types.push(self.parse_intersection_type()?);
        }
        Ok(TsType::Union(types))
    }

    fn parse_intersection_type(&mut self) -> Result<TsType, ParseError> {
        let first = self.parse_array_type()?;
        if !self.current().is_punct("&") {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.current().is_punct("&") {
            self.advance();
            types.push(self.parse_array_type()?);
        }
        Ok(TsType::Intersection(types))
    }

    fn parse_array_type(&mut self) -> Result<TsType, ParseError> {
        let mut ty = self.parse_primary_type()?;
        while self.check(&TokenKind::LBracket) && self.peek_is(1, &TokenKind::RBracket) {
            self.advance();
            self.advance();
            ty = TsType::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> Result<TsType, ParseError> {
        match &self.current().kind {
            TokenKind::String(s) => {
                let ty = TsType::Str(s.clone());
                self.advance();
                Ok(ty)
            }
            TokenKind::LBrace => self.parse_type_members().map(TsType::Literal),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(TsType::Paren(Box::new(inner)))
            }
            TokenKind::Word(w) if w == "typeof" => {
                self.advance();
                Ok(TsType::TypeOf(self.parse_qualified_name()?))
            }
            TokenKind::Word(w) if TYPE_KEYWORDS.contains(&w.as_str()) => {
                let ty = TsType::Keyword(w.clone());
                self.advance();
                Ok(ty)
            }
            TokenKind::Word(_) => self.parse_type_reference(),
            _ => Err(self.error("Expected type")),
        }
    }

    /// `Name`, `ns.Name` or `Name<Args>`.
    pub(crate) fn parse_type_reference(&mut self) -> Result<TsType, ParseError> {
        let name = self.parse_qualified_name()?;
        let mut args = Vec::new();
        if self.current().is_punct("<") {
            self.advance();
            loop {
                args.push(self.parse_type()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if !self.current().is_punct(">") {
                return Err(self.error("Expected '>'"));
            }
            self.advance();
        }
        Ok(TsType::Ref { name, args })
    }

    fn parse_qualified_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_ident()?;
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        Ok(name)
    }

    /// `{ member; member, ... }` of an interface body or type literal.
    pub(crate) fn parse_type_members(&mut self) -> Result<Vec<TsMember>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.error("Unterminated type body"));
            }
            members.push(self.parse_type_member()?);
            if !self.eat(&TokenKind::Semi)
                && !self.eat(&TokenKind::Comma)
                && !self.check(&TokenKind::RBrace)
                && !self.current().newline_before
            {
                return Err(self.error("Expected ';' between type members"));
            }
        }
        Ok(members)
    }

    fn parse_type_member(&mut self) -> Result<TsMember, ParseError> {
        if self.check_word("new") && self.peek_is(1, &TokenKind::LParen) {
            self.advance();
            let params = self.parse_params()?;
            let return_type = self.parse_optional_annotation()?;
            return Ok(TsMember::Construct {
                params,
                return_type,
            });
        }

        if self.check(&TokenKind::LParen) {
            let params = self.parse_params()?;
            let return_type = self.parse_optional_annotation()?;
            return Ok(TsMember::Call {
                params,
                return_type,
            });
        }

        // `[key: string]: T`
        if self.check(&TokenKind::LBracket)
            && self.peek_is_word(1)
            && self.peek_is(2, &TokenKind::Colon)
        {
            self.advance();
            let param = self.expect_name()?;
            self.expect(TokenKind::Colon)?;
            let key_type = self.parse_type()?;
            self.expect(TokenKind::RBracket)?;
            self.expect(TokenKind::Colon)?;
            let type_ann = self.parse_type()?;
            return Ok(TsMember::Index {
                param,
                key_type,
                type_ann,
            });
        }

        let readonly = self.check_word("readonly")
            && !self.peek_is(1, &TokenKind::Colon)
            && !self.peek_is(1, &TokenKind::Question)
            && !self.peek_is(1, &TokenKind::LParen);
        if readonly {
            self.advance();
        }

        let key = self.parse_prop_key()?;
        let optional = self.eat(&TokenKind::Question);

        if self.check(&TokenKind::LParen) {
            let params = self.parse_params()?;
            let return_type = self.parse_optional_annotation()?;
            return Ok(TsMember::Method {
                key,
                optional,
                params,
                return_type,
            });
        }

        let type_ann = self.parse_optional_annotation()?;
        Ok(TsMember::Property {
            readonly,
            key,
            optional,
            type_ann,
        })
    }

    fn parse_optional_annotation(&mut self) -> Result<Option<TsType>, ParseError> {
        if self.eat(&TokenKind::Colon) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn parse_binding_pattern(&mut self) -> Result<Pat, ParseError> {
        if !self.eat(&TokenKind::LBrace) {
            return self.expect_ident().map(Pat::Ident);
        }

        let mut props = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let is_word = self.peek_is_word(0);
            let key = self.parse_prop_key()?;
            if self.eat(&TokenKind::Colon) {
                props.push(PatProp::KeyValue(key, self.parse_binding_pattern()?));
            } else {
                match key {
                    PropKey::Ident(name)
                        if is_word && !automate_naming::is_reserved_word(&name) =>
                    {
                        props.push(PatProp::Shorthand(name))
                    }
                    _ => return Err(self.error("Expected ':' in binding pattern")),
                }
            }
            if !self.check(&TokenKind::RBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Pat::Object(props))
    }

    /// `(a, b?: T, { c })`
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            let pat = self.parse_binding_pattern()?;
            let optional = self.eat(&TokenKind::Question);
            let type_ann = self.parse_optional_annotation()?;
            params.push(Param {
                pat,
                optional,
                type_ann,
            });
            if !self.check(&TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(params)
    }
}

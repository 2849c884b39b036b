//! Expression parsing.

use super::Parser;
use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::TokenKind;

const ASSIGN_OPS: &[&str] = &["+=", "-=", "*=", "/=", "%=", "**=", "&&=", "||=", "??="];

fn binary_precedence(kind: &TokenKind) -> Option<(u8, &str)> {
    let prec = match kind {
        TokenKind::Punct(op) => match op.as_str() {
            "??" => 1,
            "||" => 2,
            "&&" => 3,
            "|" => 4,
            "^" => 5,
            "&" => 6,
            "==" | "!=" | "===" | "!==" => 7,
            "<" | ">" | "<=" | ">=" => 8,
            "+" | "-" => 9,
            "*" | "/" | "%" => 10,
            "**" => 11,
            _ => return None,
        },
        TokenKind::Word(w) if w == "instanceof" || w == "in" => 8,
        _ => return None,
    };
    match kind {
        TokenKind::Punct(op) | TokenKind::Word(op) => Some((prec, op.as_str())),
        _ => None,
    }
}

impl Parser {
    /// AssignmentExpression (no comma sequences).
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.is_arrow_start() {
            return self.parse_arrow().map(Expr::Arrow);
        }

        let target = self.parse_conditional()?;

        let op = match &self.current().kind {
            TokenKind::Assign => "=".to_string(),
            TokenKind::Punct(op) if ASSIGN_OPS.contains(&op.as_str()) => op.clone(),
            _ => return Ok(target),
        };
        if !matches!(
            target,
            Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. }
        ) {
            return Err(self.error("Invalid assignment target"));
        }
        self.advance();
        let value = self.parse_expression()?;
        Ok(Expr::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_binary(1)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_expression()?;
        Ok(Expr::Cond {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((prec, op)) = binary_precedence(&self.current().kind) {
            if prec < min_prec {
                break;
            }
            let op = op.to_string();
            self.advance();
            // `**` is right-associative
            let next_min = if op == "**" { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.current().kind {
            TokenKind::Punct(op) if matches!(op.as_str(), "!" | "-" | "+" | "~") => op.clone(),
            TokenKind::Word(w) if matches!(w.as_str(), "typeof" | "void" | "delete") => w.clone(),
            TokenKind::Word(w) if w == "await" => {
                self.advance();
                return Ok(Expr::Await(Box::new(self.parse_unary()?)));
            }
            _ => return self.parse_postfix(),
        };
        self.advance();
        let arg = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            arg: Box::new(arg),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments()?;
                    expr = Expr::Call(CallExpr {
                        callee: Box::new(expr),
                        args,
                    });
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Callee of a `new` expression: member accesses only, no calls.
    fn parse_new_callee(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::Dot) {
            let property = self.expect_name()?;
            expr = Expr::Member {
                object: Box::new(expr),
                property,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        match &token.kind {
            TokenKind::String(s) => {
                let expr = Expr::Str(s.clone());
                self.advance();
                Ok(expr)
            }
            TokenKind::Number(n) => {
                let expr = Expr::Num(n.clone());
                self.advance();
                Ok(expr)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Word(w) => match w.as_str() {
                "true" => {
                    self.advance();
                    Ok(Expr::Bool(true))
                }
                "false" => {
                    self.advance();
                    Ok(Expr::Bool(false))
                }
                "null" => {
                    self.advance();
                    Ok(Expr::Null)
                }
                "this" => {
                    self.advance();
                    Ok(Expr::ident("this"))
                }
                "function" => Ok(Expr::Function(Box::new(self.parse_function()?))),
                "async" if self.peek_word(1, "function") => {
                    Ok(Expr::Function(Box::new(self.parse_function()?)))
                }
                "new" => {
                    self.advance();
                    let callee = self.parse_new_callee()?;
                    let args = if self.check(&TokenKind::LParen) {
                        self.parse_arguments()?
                    } else {
                        Vec::new()
                    };
                    Ok(Expr::New(CallExpr {
                        callee: Box::new(callee),
                        args,
                    }))
                }
                _ => self.expect_ident().map(Expr::Ident),
            },
            _ => Err(self.error("Expected expression")),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            args.push(self.parse_element()?);
            if !self.check(&TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(args)
    }

    /// An argument or array element, possibly spread.
    fn parse_element(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Ellipsis) {
            return Ok(Expr::Spread(Box::new(self.parse_expression()?)));
        }
        self.parse_expression()
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.eat(&TokenKind::RBracket) {
            elements.push(self.parse_element()?);
            if !self.check(&TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Expr::Array(elements))
    }

    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            props.push(self.parse_prop()?);
            if !self.check(&TokenKind::RBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Expr::Object(props))
    }

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        if self.eat(&TokenKind::Ellipsis) {
            return Ok(Prop::Spread(self.parse_expression()?));
        }
        let is_word = self.peek_is_word(0);
        let key = self.parse_prop_key()?;
        if self.eat(&TokenKind::Colon) {
            return Ok(Prop::KeyValue(key, self.parse_expression()?));
        }
        match key {
            PropKey::Ident(name) if is_word && !automate_naming::is_reserved_word(&name) => {
                Ok(Prop::Shorthand(name))
            }
            _ => Err(self.error("Expected ':' after property key")),
        }
    }

    pub(crate) fn parse_prop_key(&mut self) -> Result<PropKey, ParseError> {
        let key = match &self.current().kind {
            TokenKind::Word(w) => PropKey::Ident(w.clone()),
            TokenKind::String(s) => PropKey::Str(s.clone()),
            TokenKind::Number(n) => PropKey::Num(n.clone()),
            TokenKind::LBracket => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RBracket)?;
                return Ok(PropKey::Computed(Box::new(expr)));
            }
            _ => return Err(self.error("Expected property key")),
        };
        self.advance();
        Ok(key)
    }

    /// `ident =>`, `(...) =>`, optionally prefixed by `async`.
    fn is_arrow_start(&self) -> bool {
        let mut offset = 0;
        if self.check_word("async") && !self.peek(1).newline_before {
            offset = 1;
        }

        match &self.peek(offset).kind {
            TokenKind::Word(w) => {
                !automate_naming::is_reserved_word(w) && self.peek_is(offset + 1, &TokenKind::Arrow)
            }
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut i = offset;
                loop {
                    match &self.peek(i).kind {
                        TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                        TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                            depth -= 1;
                            if depth == 0 {
                                return self.peek_is(i + 1, &TokenKind::Arrow);
                            }
                        }
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => false,
        }
    }

    fn parse_arrow(&mut self) -> Result<ArrowFn, ParseError> {
        let is_async = self.check_word("async") && !self.peek_is(1, &TokenKind::Arrow);
        if is_async {
            self.advance();
        }

        let params = if self.check(&TokenKind::LParen) {
            self.parse_params()?
        } else {
            vec![Param {
                pat: Pat::Ident(self.expect_ident()?),
                optional: false,
                type_ann: None,
            }]
        };
        self.expect(TokenKind::Arrow)?;

        let body = if self.check(&TokenKind::LBrace) {
            ArrowBody::Block(self.parse_block()?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_expression()?))
        };

        Ok(ArrowFn {
            is_async,
            params,
            body,
        })
    }
}

//! Declarator resolution
//!
//! A declarator is found in two passes. First a forward scan finds where it
//! ends: identifiers and balanced `( ... )` / `[ ... ]` groups. Then the range
//! is resolved from its last token backward: a trailing `]` makes an array
//! whose base is everything before the matching `[`, a trailing `)` makes a
//! function whose base is everything before the matching `(`, and a range that
//! is a single identifier is the name itself. Anything else is an invalid
//! declarator.
//!
//! ```text
//! a            Identifier(a)
//! a[10]        Array { base: a, size: 10 }
//! f(int x)[2]  Array { base: Function { base: f, params: [int x] }, size: 2 }
//! ```

use crate::parser::ast::*;
use crate::parser::diagnostics::{Delimiter, SyntaxError};
use crate::parser::parse::{PResult, ParseError, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse the declarator starting at `at`
    pub(crate) fn parse_declarator(&mut self, at: usize) -> PResult<Declarator> {
        let end = self.find_declarator_end(at)?;
        if end == at {
            return Err(self.expected(at, &[TokenKind::Ident]));
        }

        let declarator = self.resolve_declarator(at, end)?;
        Ok((declarator, end))
    }

    fn find_declarator_end(&self, at: usize) -> Result<usize, ParseError> {
        let mut cursor = at;
        loop {
            cursor = match self.kind(cursor) {
                TokenKind::Ident => cursor + 1,
                TokenKind::LParen => self.find_pair_forward(cursor, Delimiter::Paren)? + 1,
                TokenKind::LBracket => self.find_pair_forward(cursor, Delimiter::Bracket)? + 1,
                _ => return Ok(cursor),
            };
        }
    }

    /// Resolve the tokens `start..end` into a declarator shape
    fn resolve_declarator(&mut self, start: usize, end: usize) -> Result<Declarator, ParseError> {
        self.nested(start, |p| p.resolve_shape(start, end))
    }

    fn resolve_shape(&mut self, start: usize, end: usize) -> Result<Declarator, ParseError> {
        if start >= end {
            return Err(self.error(SyntaxError::InvalidDeclarator, start));
        }
        if end == start + 1 && self.check(start, TokenKind::Ident) {
            return Ok(Declarator::Identifier(self.token(start).clone()));
        }

        let close = end - 1;
        match self.kind(close) {
            TokenKind::RBracket => {
                let open = self.find_pair_backward(close, start, Delimiter::Bracket)?;
                let base = self.resolve_declarator(start, open)?;
                let size = if open + 1 == close {
                    None
                } else {
                    let (size, next) = self.parse_expression(open + 1)?;
                    if next != close {
                        return Err(self.expected(next, &[TokenKind::RBracket]));
                    }
                    Some(size)
                };

                Ok(Declarator::Array {
                    base: Box::new(base),
                    size,
                })
            }
            TokenKind::RParen => {
                let open = self.find_pair_backward(close, start, Delimiter::Paren)?;
                let base = self.resolve_declarator(start, open)?;
                let (params, next) = self.parse_parameters(open + 1)?;
                if next != close {
                    return Err(self.expected(next, &[TokenKind::RParen]));
                }

                Ok(Declarator::Function {
                    base: Box::new(base),
                    params,
                })
            }
            _ => Err(self.error(SyntaxError::InvalidDeclarator, start)),
        }
    }

    /// Parameter list up to (not including) the closing `)`. `()` and
    /// `(void)` both mean no parameters.
    fn parse_parameters(&mut self, at: usize) -> PResult<Vec<DeclRoot>> {
        let mut params = Vec::new();
        if self.check(at, TokenKind::RParen) {
            return Ok((params, at));
        }
        if self.check(at, TokenKind::Void) && self.check(at + 1, TokenKind::RParen) {
            return Ok((params, at + 1));
        }

        let mut cursor = at;
        loop {
            let (specifiers, next) = self.parse_specifiers(cursor)?;
            let (declarator, next) = self.parse_declarator(next)?;
            params.push(DeclRoot::parameter(specifiers, declarator));

            if !self.check(next, TokenKind::Comma) {
                return Ok((params, next));
            }
            cursor = next + 1;
        }
    }
}

//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Compound statements: `{ ... }`, with per-item error recovery
//! - Control flow: `if` / `else`, `while`
//! - Jump statements: `return`, `break`, `continue`
//! - Empty statements and expression statements
//!
//! # Grammar
//!
//! ```text
//! compound   ::= '{' ( declaration | statement )* '}'
//! statement  ::= if | while | return | break | continue
//!              | compound | ';' | expression ';'
//! ```
//!
//! Statement alternatives are tried in the order above; the first that parses
//! wins.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::diagnostics::Delimiter;
use crate::parser::parse::{PResult, Parser, Rule};
use crate::parser::token::TokenKind;
use log::debug;

impl Parser {
    /// Parse a compound statement.
    ///
    /// A block item that fails is recorded and skipped to the next
    /// synchronization point, never past the block's own closing brace. A
    /// block that is never closed is reported at its `{` and runs to the end
    /// of the file, keeping what was recorded inside it.
    pub(crate) fn parse_compound(&mut self, at: usize) -> PResult<Compound> {
        let mut cursor = self.expect(at, TokenKind::LBrace)?;
        let saved = self.take_furthest();
        let (close, closed) = match self.find_pair_forward(at, Delimiter::Brace) {
            Ok(close) => (close, true),
            Err(error) => {
                self.report(error);
                (self.eof_index(), false)
            }
        };

        let mut items = Vec::new();
        let mut after_failure = false;
        let alternatives: [Rule<Stmt>; 2] = [Parser::parse_block_declaration, Parser::parse_statement];

        while cursor < close {
            self.restore_furthest(None);
            match self.first_of(cursor, &alternatives) {
                Ok((item, next)) => {
                    items.push(item);
                    cursor = next;
                    after_failure = false;
                }
                Err(error) => {
                    cursor = self.recover(cursor, error, close, after_failure);
                    after_failure = true;
                }
            }
        }
        self.restore_furthest(saved);

        if !closed {
            debug!("unclosed block at token {} runs to end of file", at);
            return Ok((Compound { items }, cursor));
        }
        let end = self.expect(cursor, TokenKind::RBrace)?;
        Ok((Compound { items }, end))
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self, at: usize) -> PResult<Stmt> {
        let alternatives: [Rule<Stmt>; 8] = [
            Parser::parse_if,
            Parser::parse_while,
            Parser::parse_return,
            Parser::parse_break,
            Parser::parse_continue,
            Parser::parse_compound_statement,
            Parser::parse_empty,
            Parser::parse_expression_statement,
        ];
        self.nested(at, |p| p.first_of(at, &alternatives))
    }

    /// if (cond) stmt [else stmt]
    fn parse_if(&mut self, at: usize) -> PResult<Stmt> {
        let cursor = self.expect(at, TokenKind::If)?;
        let cursor = self.expect(cursor, TokenKind::LParen)?;
        let (cond, cursor) = self.parse_expression(cursor)?;
        let cursor = self.expect(cursor, TokenKind::RParen)?;
        let (then_branch, mut cursor) = self.parse_statement(cursor)?;

        let else_branch = if self.check(cursor, TokenKind::Else) {
            let (branch, next) = self.parse_statement(cursor + 1)?;
            cursor = next;
            Some(Box::new(branch))
        } else {
            None
        };

        Ok((
            Stmt::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch,
            },
            cursor,
        ))
    }

    /// while (cond) stmt
    fn parse_while(&mut self, at: usize) -> PResult<Stmt> {
        let cursor = self.expect(at, TokenKind::While)?;
        let cursor = self.expect(cursor, TokenKind::LParen)?;
        let (cond, cursor) = self.parse_expression(cursor)?;
        let cursor = self.expect(cursor, TokenKind::RParen)?;
        let (body, end) = self.parse_statement(cursor)?;

        Ok((
            Stmt::While {
                cond,
                body: Box::new(body),
            },
            end,
        ))
    }

    /// return [expr];
    ///
    /// A value followed by something other than `;` is still a return
    /// statement; the missing `;` is recorded and parsing goes on.
    fn parse_return(&mut self, at: usize) -> PResult<Stmt> {
        let cursor = self.expect(at, TokenKind::Return)?;
        if self.check(cursor, TokenKind::Semicolon) {
            return Ok((Stmt::Return(None), cursor + 1));
        }

        let (value, next) = self.parse_expression(cursor)?;
        match self.expect(next, TokenKind::Semicolon) {
            Ok(end) => Ok((Stmt::Return(Some(value)), end)),
            Err(error) => {
                self.report(error);
                Ok((Stmt::Return(Some(value)), next))
            }
        }
    }

    fn parse_break(&mut self, at: usize) -> PResult<Stmt> {
        let cursor = self.expect(at, TokenKind::Break)?;
        let end = self.expect(cursor, TokenKind::Semicolon)?;
        Ok((Stmt::Break, end))
    }

    fn parse_continue(&mut self, at: usize) -> PResult<Stmt> {
        let cursor = self.expect(at, TokenKind::Continue)?;
        let end = self.expect(cursor, TokenKind::Semicolon)?;
        Ok((Stmt::Continue, end))
    }

    fn parse_compound_statement(&mut self, at: usize) -> PResult<Stmt> {
        let (compound, end) = self.parse_compound(at)?;
        Ok((Stmt::Compound(compound), end))
    }

    fn parse_empty(&mut self, at: usize) -> PResult<Stmt> {
        let end = self.expect(at, TokenKind::Semicolon)?;
        Ok((Stmt::Empty, end))
    }

    fn parse_expression_statement(&mut self, at: usize) -> PResult<Stmt> {
        let (expr, cursor) = self.parse_expression(at)?;
        let end = self.expect(cursor, TokenKind::Semicolon)?;
        Ok((Stmt::Expression(expr), end))
    }
}

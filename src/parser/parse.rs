//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and the core parsing infrastructure:
//! the rule result type, the ordered-alternative combinator, the nesting guard,
//! panic-mode synchronization and the compilation-unit entry point.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: declaration specifiers, declarations and function definitions
//! - `declarator`: resolving a declarator's token range into identifier/array/function
//! - `statements`: compound statements (with recovery) and the statement forms
//! - `expressions`: the precedence cascade from assignment down to primary
//!
//! # Cursors
//!
//! There is no shared "current position". Every rule receives the index of the
//! token it starts at and returns the node together with the index just past
//! what it consumed ([`PResult`]). Backtracking is simply calling another rule
//! with the same start index. A failing rule returns a [`ParseError`] whose
//! `depth` is the index of the first token it could not consume; when several
//! alternatives fail, the deepest one wins.

use crate::parser::ast::*;
use crate::parser::diagnostics::{Delimiter, Diagnostic, Diagnostics, Placement, SyntaxError};
use crate::parser::lexer;
use crate::parser::token::{Token, TokenKind};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Default bound on grammar nesting (parenthesized expressions, unary and cast
/// chains, nested statements, declarator suffixes).
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

/// A failed rule: the diagnostic it would report and how far it got.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{diagnostic}")]
pub struct ParseError {
    pub diagnostic: Diagnostic,
    /// Index of the first token the rule could not consume
    pub depth: usize,
}

impl ParseError {
    pub fn error(&self) -> &SyntaxError {
        &self.diagnostic.error
    }
}

/// Result of a grammar rule: the node and the cursor just past it.
pub(crate) type PResult<T> = Result<(T, usize), ParseError>;

/// A grammar rule usable as an alternative in [`Parser::first_of`].
pub(crate) type Rule<T> = fn(&mut Parser, usize) -> PResult<T>;

/// Everything one parse run produces.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Best-effort tree; only trustworthy when `diagnostics` is empty
    pub unit: CompilationUnit,
    pub diagnostics: Diagnostics,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// The compilation unit, or the (non-empty) diagnostics if there were any.
    pub fn into_result(self) -> Result<CompilationUnit, Diagnostics> {
        if self.diagnostics.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(self.unit)
        }
    }
}

/// Parse a token stream with the default configuration.
pub fn parse_tokens(tokens: Vec<Token>) -> ParseOutput {
    Parser::new(tokens).parse()
}

/// Tokenize and parse source text with the default configuration.
pub fn parse_source(source: &str) -> ParseOutput {
    Parser::from_source(source).parse()
}

/// Recursive descent parser for the ZQC language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) diagnostics: Diagnostics,
    config: ParserConfig,
    nesting: usize,
    /// Deepest failure discarded by `first_of` since the current recovery
    /// loop iteration started.
    furthest: Option<ParseError>,
    unary_memo: FxHashMap<usize, PResult<Expr>>,
}

impl Parser {
    /// Create a parser over `tokens`, appending an end-of-file token if the
    /// stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|token| token.line).unwrap_or(1);
            tokens.push(Token::eof(line));
        }

        Self {
            tokens,
            diagnostics: Diagnostics::new(),
            config: ParserConfig::default(),
            nesting: 0,
            furthest: None,
            unary_memo: FxHashMap::default(),
        }
    }

    pub fn from_source(source: &str) -> Self {
        Parser::new(lexer::tokenize(source))
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parse the whole token stream.
    pub fn parse(mut self) -> ParseOutput {
        debug!("parsing {} tokens", self.tokens.len());
        let unit = self.parse_compilation_unit();
        debug!(
            "parsed {} top-level declarations with {} diagnostics",
            unit.declarations.len(),
            self.diagnostics.len()
        );

        ParseOutput {
            unit,
            diagnostics: self.diagnostics,
        }
    }

    /// compilation-unit ::= ( declaration | function-definition )*
    ///
    /// A top-level item that matches neither alternative is recorded and
    /// skipped up to the next synchronization point.
    fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut unit = CompilationUnit::new();
        let end = self.eof_index();
        let mut cursor = 0;
        let mut after_failure = false;

        while cursor < end {
            self.furthest = None;
            let alternatives: [Rule<Declaration>; 2] =
                [Parser::parse_declaration, Parser::parse_function_definition];

            match self.first_of(cursor, &alternatives) {
                Ok((declaration, next)) => {
                    unit.declarations.push(declaration);
                    cursor = next;
                    after_failure = false;
                }
                Err(error) => {
                    cursor = self.recover(cursor, error, end, after_failure);
                    after_failure = true;
                }
            }
        }

        unit
    }

    // ===== Combinators =====

    /// Try each rule from the same start; return the first success, or the
    /// deepest failure once all of them have failed (on equal depth the later
    /// rule wins). Diagnostics recorded by a failed rule are rolled back.
    pub(crate) fn first_of<T>(&mut self, at: usize, rules: &[Rule<T>]) -> PResult<T> {
        let mut deepest: Option<ParseError> = None;

        for rule in rules {
            let checkpoint = self.diagnostics.checkpoint();
            match rule(self, at) {
                Ok(done) => return Ok(done),
                Err(error) => {
                    trace!("alternative at {} failed at {}: {}", at, error.depth, error);
                    self.diagnostics.rollback(checkpoint);
                    self.note_failure(&error);
                    deepest = match deepest {
                        Some(best) if best.depth > error.depth => Some(best),
                        _ => Some(error),
                    };
                }
            }
        }

        match deepest {
            Some(error) => Err(error),
            None => Err(self.error(SyntaxError::ExpectedExpression, at)),
        }
    }

    /// Run `rule` one nesting level deeper, failing instead of recursing past
    /// the configured limit.
    pub(crate) fn nested<T>(
        &mut self,
        at: usize,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.nesting >= self.config.max_nesting {
            return Err(self.error(
                SyntaxError::NestingTooDeep {
                    limit: self.config.max_nesting,
                },
                at,
            ));
        }

        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    /// Memoized lookup for rules that are retried from the same cursor.
    pub(crate) fn memo_unary(&mut self, at: usize) -> Option<PResult<Expr>> {
        self.unary_memo.get(&at).cloned()
    }

    pub(crate) fn store_unary(&mut self, at: usize, result: &PResult<Expr>) {
        self.unary_memo.insert(at, result.clone());
    }

    // ===== Recovery =====

    fn note_failure(&mut self, error: &ParseError) {
        let deeper = match &self.furthest {
            Some(furthest) => error.depth > furthest.depth,
            None => true,
        };
        if deeper {
            self.furthest = Some(error.clone());
        }
    }

    /// The failure to surface for an item: `error`, or a strictly deeper
    /// failure discarded earlier in the same item.
    fn surfaced(&mut self, error: ParseError) -> ParseError {
        match self.furthest.take() {
            Some(furthest) if furthest.depth > error.depth => furthest,
            _ => error,
        }
    }

    /// Record a failure that no alternative could absorb.
    pub(crate) fn report(&mut self, error: ParseError) {
        let error = self.surfaced(error);
        self.record(error.diagnostic);
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.iter().any(|recorded| *recorded == diagnostic) {
            debug!("dropping repeated diagnostic: {}", diagnostic);
            return;
        }

        debug!("recorded: {}", diagnostic);
        self.diagnostics.add(diagnostic);
    }

    /// Record the failure of the item that started at `start` and return the
    /// cursor to resume from, never past `limit`.
    ///
    /// Skipping starts from the token before the one that failed, so the part
    /// of the item that did parse is not parsed again. An item that fails on
    /// its first token right after a `)` the previous failed item was skipped
    /// to belongs to the same error and is skipped silently.
    pub(crate) fn recover(
        &mut self,
        start: usize,
        error: ParseError,
        limit: usize,
        after_failure: bool,
    ) -> usize {
        let error = self.surfaced(error);
        let depth = error.depth;

        if after_failure && depth == start && start > 0 && self.check(start - 1, TokenKind::RParen)
        {
            debug!("skipping follow-on error: {}", error.diagnostic);
        } else {
            self.record(error.diagnostic);
        }

        let from = if depth > start { depth - 1 } else { start };
        let resume = self.synchronize(from, limit);
        debug!("resynchronized at token {}", resume);
        resume
    }

    pub(crate) fn take_furthest(&mut self) -> Option<ParseError> {
        self.furthest.take()
    }

    pub(crate) fn restore_furthest(&mut self, saved: Option<ParseError>) {
        self.furthest = saved;
    }

    /// The synchronization point after a failure at `from`: the token after
    /// the first `;` or `)`, or the first token on a later line, whichever
    /// comes first. Never moves past `limit`.
    pub(crate) fn synchronize(&self, from: usize, limit: usize) -> usize {
        let mut at = from;

        while at < limit {
            let kind = self.kind(at);
            at += 1;
            if matches!(kind, TokenKind::Semicolon | TokenKind::RParen)
                || self.token(at).line != self.token(at - 1).line
            {
                break;
            }
        }

        at.min(limit)
    }

    /// Index of the token closing the group opened at `open_at`. Paren and
    /// bracket scans give up at `;`, `{` or `}`, which never occur inside
    /// them.
    pub(crate) fn find_pair_forward(
        &self,
        open_at: usize,
        delimiter: Delimiter,
    ) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut at = open_at;

        loop {
            let kind = self.kind(at);
            if kind == delimiter.open() {
                depth += 1;
            } else if kind == delimiter.close() {
                depth -= 1;
                if depth == 0 {
                    return Ok(at);
                }
            } else if kind == TokenKind::Eof
                || (delimiter != Delimiter::Brace
                    && matches!(
                        kind,
                        TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace
                    ))
            {
                break;
            }
            at += 1;
        }

        Err(self.error(SyntaxError::MismatchedDelimiter { delimiter }, open_at))
    }

    /// Index of the token opening the group closed at `close_at`, searching no
    /// further back than `floor`.
    pub(crate) fn find_pair_backward(
        &self,
        close_at: usize,
        floor: usize,
        delimiter: Delimiter,
    ) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut at = close_at;

        loop {
            let kind = self.kind(at);
            if kind == delimiter.close() {
                depth += 1;
            } else if kind == delimiter.open() {
                depth -= 1;
                if depth == 0 {
                    return Ok(at);
                }
            }
            if at == floor {
                break;
            }
            at -= 1;
        }

        Err(self.error(SyntaxError::MismatchedDelimiter { delimiter }, close_at))
    }

    // ===== Helper methods =====

    pub(crate) fn eof_index(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Token at `at`, clamped to the end-of-file token.
    pub(crate) fn token(&self, at: usize) -> &Token {
        &self.tokens[at.min(self.tokens.len() - 1)]
    }

    pub(crate) fn kind(&self, at: usize) -> TokenKind {
        self.token(at).kind
    }

    pub(crate) fn check(&self, at: usize, kind: TokenKind) -> bool {
        self.kind(at) == kind
    }

    /// Consume a token of `kind` at `at`.
    pub(crate) fn expect(&self, at: usize, kind: TokenKind) -> Result<usize, ParseError> {
        self.expect_any(at, &[kind])
    }

    pub(crate) fn expect_any(&self, at: usize, kinds: &[TokenKind]) -> Result<usize, ParseError> {
        if kinds.contains(&self.kind(at)) {
            Ok(at + 1)
        } else {
            Err(self.expected(at, kinds))
        }
    }

    /// Failure for a missing token at `at`. The caret goes after the previous
    /// token when `at` is end of file or starts a new line, before a brace,
    /// and at the offending token otherwise.
    pub(crate) fn expected(&self, at: usize, kinds: &[TokenKind]) -> ParseError {
        let token = self.token(at);
        let (placement, position) = if at > 0
            && (token.kind == TokenKind::Eof || token.line != self.token(at - 1).line)
        {
            (Placement::After, at - 1)
        } else if matches!(token.kind, TokenKind::LBrace | TokenKind::RBrace) {
            (Placement::Before, at)
        } else {
            (Placement::At, at)
        };

        ParseError {
            diagnostic: Diagnostic::new(
                SyntaxError::expected(kinds, placement),
                self.token(position),
                position.min(self.eof_index()),
            ),
            depth: at,
        }
    }

    /// Failure anchored at the token `at`, with depth `at`.
    pub(crate) fn error(&self, error: SyntaxError, at: usize) -> ParseError {
        let position = at.min(self.eof_index());
        ParseError {
            diagnostic: Diagnostic::new(error, self.token(position), position),
            depth: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_missing_eof() {
        let parser = Parser::new(vec![Token::new("x", TokenKind::Ident, 4, true)]);
        assert_eq!(parser.tokens().len(), 2);
        assert_eq!(parser.tokens()[1].kind, TokenKind::Eof);
        assert_eq!(parser.tokens()[1].line, 4);
    }

    #[test]
    fn test_empty_stream_parses_to_empty_unit() {
        let output = parse_tokens(Vec::new());
        assert!(!output.has_errors());
        assert!(output.unit.declarations.is_empty());
    }

    #[test]
    fn test_synchronize_stops_after_semicolon() {
        let parser = Parser::from_source("a b ; c d");
        assert_eq!(parser.synchronize(0, parser.eof_index()), 3);
    }

    #[test]
    fn test_synchronize_stops_at_new_line() {
        let parser = Parser::from_source("a b\nc ; d");
        assert_eq!(parser.synchronize(0, parser.eof_index()), 2);
    }

    #[test]
    fn test_synchronize_respects_limit() {
        let parser = Parser::from_source("a b c d ;");
        assert_eq!(parser.synchronize(0, 2), 2);
    }

    #[test]
    fn test_find_pair_forward_and_backward() {
        let parser = Parser::from_source("f ( a [ 1 ] , ( b ) )");
        assert_eq!(parser.find_pair_forward(1, Delimiter::Paren).unwrap(), 10);
        assert_eq!(parser.find_pair_backward(10, 0, Delimiter::Paren).unwrap(), 1);
        assert_eq!(parser.find_pair_forward(3, Delimiter::Bracket).unwrap(), 5);
    }

    #[test]
    fn test_find_pair_forward_stops_at_semicolon() {
        let parser = Parser::from_source("a [ ; ]");
        let error = parser.find_pair_forward(1, Delimiter::Bracket).unwrap_err();
        assert_eq!(
            error.error(),
            &SyntaxError::MismatchedDelimiter {
                delimiter: Delimiter::Bracket
            }
        );
        assert_eq!(error.diagnostic.position, 1);
    }

    #[test]
    fn test_expected_placement() {
        let parser = Parser::from_source("int a\nb {");
        let after = parser.expected(2, &[TokenKind::Semicolon]);
        assert_eq!(after.diagnostic.position, 1);
        assert_eq!(after.error().placement(), Placement::After);
        assert_eq!(after.depth, 2);

        let before = parser.expected(3, &[TokenKind::Semicolon]);
        assert_eq!(before.error().placement(), Placement::Before);

        let at = parser.expected(1, &[TokenKind::Semicolon]);
        assert_eq!(at.error().placement(), Placement::At);
    }
}

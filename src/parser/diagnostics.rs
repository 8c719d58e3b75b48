//! Syntax diagnostics
//!
//! [`SyntaxError`] is the typed failure a grammar rule produces. Once a failure
//! survives every alternative it is recorded as a [`Diagnostic`] in the
//! per-parse [`Diagnostics`] collector, which the parser hands back with its
//! result.

use super::token::{Token, TokenKind};
use crossterm::style::Stylize;
use std::fmt;
use thiserror::Error;

/// Where the caret goes relative to the token a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    At,
    After,
    Before,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::At => write!(f, "at"),
            Placement::After => write!(f, "after"),
            Placement::Before => write!(f, "before"),
        }
    }
}

/// The set of token kinds a failed `expect` would have accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expected(pub Vec<TokenKind>);

impl Expected {
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.0.contains(&kind)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "nothing"),
            [kind] => write!(f, "{}", kind),
            kinds => {
                write!(f, "one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub fn open(self) -> TokenKind {
        match self {
            Delimiter::Paren => TokenKind::LParen,
            Delimiter::Bracket => TokenKind::LBracket,
            Delimiter::Brace => TokenKind::LBrace,
        }
    }

    pub fn close(self) -> TokenKind {
        match self {
            Delimiter::Paren => TokenKind::RParen,
            Delimiter::Bracket => TokenKind::RBracket,
            Delimiter::Brace => TokenKind::RBrace,
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Paren => write!(f, "parenthesis"),
            Delimiter::Bracket => write!(f, "square bracket"),
            Delimiter::Brace => write!(f, "brace"),
        }
    }
}

/// Every kind of syntax error the parser reports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected {expected}")]
    ExpectedToken {
        expected: Expected,
        placement: Placement,
    },

    #[error("mismatched {delimiter}")]
    MismatchedDelimiter { delimiter: Delimiter },

    #[error("invalid declarator")]
    InvalidDeclarator,

    #[error("expected expression")]
    ExpectedExpression,

    #[error("nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("unterminated literal")]
    UnterminatedLiteral,
}

impl SyntaxError {
    pub fn expected(kinds: &[TokenKind], placement: Placement) -> Self {
        SyntaxError::ExpectedToken {
            expected: Expected(kinds.to_vec()),
            placement,
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            SyntaxError::ExpectedToken { placement, .. } => *placement,
            _ => Placement::At,
        }
    }
}

/// A recorded syntax error, anchored to a token of the parsed stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub error: SyntaxError,
    /// Index of the token the caret points at
    pub position: usize,
    pub line: usize,
    pub lexeme: String,
}

impl Diagnostic {
    pub fn new(error: SyntaxError, token: &Token, position: usize) -> Self {
        Diagnostic {
            error,
            position,
            line: token.line,
            lexeme: token.lexeme.clone(),
        }
    }

    /// `expected ';' after 'a'`
    pub fn message(&self) -> String {
        if self.lexeme.is_empty() {
            format!("{} {} end of file", self.error, self.error.placement())
        } else {
            format!("{} {} '{}'", self.error, self.error.placement(), self.lexeme)
        }
    }

    /// Render the diagnostic the way the command line prints it: a header, the
    /// offending source line rebuilt from its tokens, and a caret.
    pub fn render(&self, tokens: &[Token], color: bool) -> String {
        let mut text = String::new();
        let mut caret = 0;

        for (index, token) in tokens.iter().enumerate() {
            if token.line != self.line || token.kind == TokenKind::Eof {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            if index == self.position {
                caret = text.chars().count();
                if self.error.placement() == Placement::After {
                    caret += token.lexeme.chars().count();
                }
            }
            text.push_str(&token.lexeme);
        }
        if self.position >= tokens.len() || tokens[self.position].kind == TokenKind::Eof {
            caret = text.chars().count();
        }

        let pad = " ".repeat(caret);
        if color {
            format!(
                "{} {} {}\n    {}\n    {}{}",
                self.line,
                "error:".red().bold(),
                self.message().bold(),
                text,
                pad,
                "^".green()
            )
        } else {
            format!(
                "{} error: {}\n    {}\n    {}^",
                self.line,
                self.message(),
                text,
                pad
            )
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message())
    }
}

/// Ordered, append-only collection of diagnostics for one parse run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Render every diagnostic, separated by blank lines.
    pub fn render(&self, tokens: &[Token], color: bool) -> String {
        self.entries
            .iter()
            .map(|diagnostic| diagnostic.render(tokens, color))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Drop everything recorded since `checkpoint`; used when a speculative
    /// alternative is abandoned.
    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        self.entries.truncate(checkpoint);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

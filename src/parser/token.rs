//! Token contract shared by the lexer, the token-file loader and the parser
//!
//! A token stream is an ordered, 0-indexed, immutable `Vec<Token>` whose last element is
//! always a [`TokenKind::Eof`] marker. The parser only ever looks at [`Token::kind`],
//! [`Token::lexeme`] and [`Token::line`]; [`Token::number`] exists for dumps.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

static NEXT_TOKEN_NUMBER: AtomicUsize = AtomicUsize::new(0);

/// Every token kind the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Tilde,

    // One or two character operators
    Plus,
    PlusEq,
    Minus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpEq,
    AndAnd,
    Pipe,
    PipeEq,
    OrOr,
    Caret,
    CaretEq,
    Bang,
    NotEq,
    Eq,
    EqEq,
    Gt,
    Ge,
    GtGt,
    Lt,
    Le,
    LtLt,

    // Literals
    Ident,
    StringLit,
    IntConst,
    DoubleConst,
    CharConst,

    // Keywords
    If,
    Else,
    While,
    Return,
    Break,
    Continue,
    Print,

    // Declaration specifiers
    Int,
    Double,
    Char,
    Void,

    Eof,
    Unknown,
}

impl TokenKind {
    pub const ALL: [TokenKind; 55] = [
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::Comma,
        TokenKind::Semicolon,
        TokenKind::Tilde,
        TokenKind::Plus,
        TokenKind::PlusEq,
        TokenKind::Minus,
        TokenKind::MinusEq,
        TokenKind::Star,
        TokenKind::StarEq,
        TokenKind::Slash,
        TokenKind::SlashEq,
        TokenKind::Percent,
        TokenKind::PercentEq,
        TokenKind::Amp,
        TokenKind::AmpEq,
        TokenKind::AndAnd,
        TokenKind::Pipe,
        TokenKind::PipeEq,
        TokenKind::OrOr,
        TokenKind::Caret,
        TokenKind::CaretEq,
        TokenKind::Bang,
        TokenKind::NotEq,
        TokenKind::Eq,
        TokenKind::EqEq,
        TokenKind::Gt,
        TokenKind::Ge,
        TokenKind::GtGt,
        TokenKind::Lt,
        TokenKind::Le,
        TokenKind::LtLt,
        TokenKind::Ident,
        TokenKind::StringLit,
        TokenKind::IntConst,
        TokenKind::DoubleConst,
        TokenKind::CharConst,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::While,
        TokenKind::Return,
        TokenKind::Break,
        TokenKind::Continue,
        TokenKind::Print,
        TokenKind::Int,
        TokenKind::Double,
        TokenKind::Char,
        TokenKind::Void,
        TokenKind::Eof,
        TokenKind::Unknown,
    ];

    /// Stable snake_case name used by the token file format.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LParen => "left_paren",
            TokenKind::RParen => "right_paren",
            TokenKind::LBracket => "left_bracket",
            TokenKind::RBracket => "right_bracket",
            TokenKind::LBrace => "left_brace",
            TokenKind::RBrace => "right_brace",
            TokenKind::Comma => "comma",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Tilde => "tilde",
            TokenKind::Plus => "add",
            TokenKind::PlusEq => "add_assign",
            TokenKind::Minus => "sub",
            TokenKind::MinusEq => "sub_assign",
            TokenKind::Star => "mul",
            TokenKind::StarEq => "mul_assign",
            TokenKind::Slash => "div",
            TokenKind::SlashEq => "div_assign",
            TokenKind::Percent => "mod",
            TokenKind::PercentEq => "mod_assign",
            TokenKind::Amp => "and",
            TokenKind::AmpEq => "and_assign",
            TokenKind::AndAnd => "logical_and",
            TokenKind::Pipe => "or",
            TokenKind::PipeEq => "or_assign",
            TokenKind::OrOr => "logical_or",
            TokenKind::Caret => "xor",
            TokenKind::CaretEq => "xor_assign",
            TokenKind::Bang => "not",
            TokenKind::NotEq => "not_equal",
            TokenKind::Eq => "assign",
            TokenKind::EqEq => "equal",
            TokenKind::Gt => "greater",
            TokenKind::Ge => "greater_equal",
            TokenKind::GtGt => "right_shift",
            TokenKind::Lt => "less",
            TokenKind::Le => "less_equal",
            TokenKind::LtLt => "left_shift",
            TokenKind::Ident => "identifier",
            TokenKind::StringLit => "string",
            TokenKind::IntConst => "integer_constant",
            TokenKind::DoubleConst => "double_constant",
            TokenKind::CharConst => "character_constant",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Print => "print",
            TokenKind::Int => "int",
            TokenKind::Double => "double",
            TokenKind::Char => "char",
            TokenKind::Void => "void",
            TokenKind::Eof => "eof",
            TokenKind::Unknown => "unknown",
        }
    }

    /// Inverse of [`TokenKind::name`].
    pub fn from_name(name: &str) -> Option<TokenKind> {
        static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
        TABLE
            .get_or_init(|| TokenKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect())
            .get(name)
            .copied()
    }

    /// Fixed spelling of punctuation, operators and keywords; `None` for literal kinds.
    pub fn spelling(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Tilde => "~",
            TokenKind::Plus => "+",
            TokenKind::PlusEq => "+=",
            TokenKind::Minus => "-",
            TokenKind::MinusEq => "-=",
            TokenKind::Star => "*",
            TokenKind::StarEq => "*=",
            TokenKind::Slash => "/",
            TokenKind::SlashEq => "/=",
            TokenKind::Percent => "%",
            TokenKind::PercentEq => "%=",
            TokenKind::Amp => "&",
            TokenKind::AmpEq => "&=",
            TokenKind::AndAnd => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipeEq => "|=",
            TokenKind::OrOr => "||",
            TokenKind::Caret => "^",
            TokenKind::CaretEq => "^=",
            TokenKind::Bang => "!",
            TokenKind::NotEq => "!=",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::GtGt => ">>",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::LtLt => "<<",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Print => "print",
            TokenKind::Int => "int",
            TokenKind::Double => "double",
            TokenKind::Char => "char",
            TokenKind::Void => "void",
            TokenKind::Ident
            | TokenKind::StringLit
            | TokenKind::IntConst
            | TokenKind::DoubleConst
            | TokenKind::CharConst
            | TokenKind::Eof
            | TokenKind::Unknown => return None,
        };
        Some(text)
    }

    /// `int`, `double`, `char` and `void`.
    pub fn is_specifier(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Double | TokenKind::Char | TokenKind::Void
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spelling() {
            Some(text) => write!(f, "'{}'", text),
            None => match self {
                TokenKind::Ident => write!(f, "identifier"),
                TokenKind::StringLit => write!(f, "string literal"),
                TokenKind::IntConst => write!(f, "integer constant"),
                TokenKind::DoubleConst => write!(f, "double constant"),
                TokenKind::CharConst => write!(f, "character constant"),
                TokenKind::Eof => write!(f, "end of file"),
                _ => write!(f, "unknown token"),
            },
        }
    }
}

/// A single lexeme with its kind, source line and well-formedness flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub number: usize,
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: usize,
    pub valid: bool,
}

impl Token {
    /// Create a token, drawing its number from the process-wide counter.
    pub fn new(lexeme: impl Into<String>, kind: TokenKind, line: usize, valid: bool) -> Self {
        Self {
            number: NEXT_TOKEN_NUMBER.fetch_add(1, Ordering::Relaxed),
            lexeme: lexeme.into(),
            kind,
            line,
            valid,
        }
    }

    /// Create a token with an explicit number, as recorded in a token file.
    pub fn with_number(
        number: usize,
        lexeme: impl Into<String>,
        kind: TokenKind,
        line: usize,
        valid: bool,
    ) -> Self {
        Self {
            number,
            lexeme: lexeme.into(),
            kind,
            line,
            valid,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new("", TokenKind::Eof, line, true)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_strictly_increase() {
        let a = Token::new("a", TokenKind::Ident, 1, true);
        let b = Token::new("b", TokenKind::Ident, 1, true);
        assert!(b.number > a.number);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TokenKind::from_name("punctuator"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Semicolon.to_string(), "';'");
        assert_eq!(TokenKind::Ident.to_string(), "identifier");
        assert_eq!(Token::eof(3).to_string(), "end of file");
    }
}

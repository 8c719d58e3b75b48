//! Lexer (tokenizer) for ZQC source code
//!
//! Converts raw source text into the flat [`Token`] stream consumed by the parser.
//! The lexer never fails: characters it cannot classify become [`TokenKind::Unknown`]
//! tokens and unterminated literals are emitted with `valid == false`, leaving the
//! parser to report whatever syntax errors follow from them.

use super::token::{Token, TokenKind};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

fn keywords() -> &'static FxHashMap<&'static str, TokenKind> {
    static KEYWORDS: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        [
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
        ]
        .into_iter()
        .filter_map(|kind| kind.spelling().map(|text| (text, kind)))
        .collect()
    })
}

/// Tokenize a whole source file.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Lexer for ZQC source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    /// Offset of the first character of the token being scanned.
    start: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            start: 0,
        }
    }

    /// Tokenize the entire input; the result always ends with an end-of-file token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::eof(self.line));
                break;
            }

            tokens.push(self.next_token());
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        self.start = self.position;
        let Some(ch) = self.advance() else {
            return Token::eof(self.line);
        };

        match ch {
            '"' => self.quoted_literal('"', TokenKind::StringLit),
            '\'' => self.quoted_literal('\'', TokenKind::CharConst),
            '0'..='9' => self.number_literal(),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(),

            '+' => self.with_eq(TokenKind::PlusEq, TokenKind::Plus),
            '-' => self.with_eq(TokenKind::MinusEq, TokenKind::Minus),
            '*' => self.with_eq(TokenKind::StarEq, TokenKind::Star),
            '/' => self.with_eq(TokenKind::SlashEq, TokenKind::Slash),
            '%' => self.with_eq(TokenKind::PercentEq, TokenKind::Percent),
            '!' => self.with_eq(TokenKind::NotEq, TokenKind::Bang),
            '=' => self.with_eq(TokenKind::EqEq, TokenKind::Eq),
            '^' => self.with_eq(TokenKind::CaretEq, TokenKind::Caret),

            '&' => self.either('&', TokenKind::AmpEq, TokenKind::AndAnd, TokenKind::Amp),
            '|' => self.either('|', TokenKind::PipeEq, TokenKind::OrOr, TokenKind::Pipe),
            '>' => self.either('>', TokenKind::Ge, TokenKind::GtGt, TokenKind::Gt),
            '<' => self.either('<', TokenKind::Le, TokenKind::LtLt, TokenKind::Lt),

            '~' => self.make(TokenKind::Tilde),
            '(' => self.make(TokenKind::LParen),
            ')' => self.make(TokenKind::RParen),
            '[' => self.make(TokenKind::LBracket),
            ']' => self.make(TokenKind::RBracket),
            '{' => self.make(TokenKind::LBrace),
            '}' => self.make(TokenKind::RBrace),
            ',' => self.make(TokenKind::Comma),
            ';' => self.make(TokenKind::Semicolon),

            _ => {
                let token = Token::new(self.lexeme(), TokenKind::Unknown, self.line, false);
                log::warn!("line {}: unexpected character {:?}", self.line, ch);
                token
            }
        }
    }

    /// `op=` when the next character is `=`, otherwise the single-character operator.
    fn with_eq(&mut self, assign: TokenKind, plain: TokenKind) -> Token {
        if self.peek() == Some('=') {
            self.advance();
            self.make(assign)
        } else {
            self.make(plain)
        }
    }

    /// `op=`, doubled `opop`, or the single-character operator.
    fn either(&mut self, doubled: char, assign: TokenKind, twice: TokenKind, plain: TokenKind) -> Token {
        if self.peek() == Some('=') {
            self.advance();
            self.make(assign)
        } else if self.peek() == Some(doubled) {
            self.advance();
            self.make(twice)
        } else {
            self.make(plain)
        }
    }

    /// String or character literal. The lexeme keeps its quotes and escape sequences
    /// verbatim; a literal cut short by a newline or end of input is marked invalid.
    fn quoted_literal(&mut self, quote: char, kind: TokenKind) -> Token {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => break,
                '\\' => {
                    self.advance();
                    if self.peek().is_some_and(|next| next != '\n') {
                        self.advance();
                    }
                }
                _ if ch == quote => {
                    self.advance();
                    return Token::new(self.lexeme(), kind, self.line, true);
                }
                _ => {
                    self.advance();
                }
            }
        }

        log::warn!("line {}: unterminated {}", self.line, kind);
        Token::new(self.lexeme(), kind, self.line, false)
    }

    /// Integer (`42`) or double (`4.25`) constant
    fn number_literal(&mut self) -> Token {
        self.skip_digits();

        if self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
            return self.make(TokenKind::DoubleConst);
        }

        self.make(TokenKind::IntConst)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance();
        }
    }

    fn identifier_or_keyword(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            self.advance();
        }

        let text = self.lexeme();
        let kind = keywords()
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenKind::Ident);
        Token::new(text, kind, self.line, true)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */); an unterminated comment runs to end of input.
    fn skip_block_comment(&mut self) {
        let line = self.line;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }

        log::warn!("line {}: unterminated block comment", line);
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(self.lexeme(), kind, self.line, true)
    }

    fn lexeme(&self) -> String {
        self.input[self.start..self.position].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("int main() { return 0; }");

        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::IntConst,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, "main");
        assert_eq!(tokens[6].lexeme, "0");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+= -= *= /= %= == != && || << >> <= >= &= |= ^= ~"),
            vec![
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::PercentEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::LtLt,
                TokenKind::GtGt,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AmpEq,
                TokenKind::PipeEq,
                TokenKind::CaretEq,
                TokenKind::Tilde,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = tokenize("int x; // comment\nint y; /* block\ncomment */ int z;");

        let idents: Vec<(&str, usize)> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| (t.lexeme.as_str(), t.line))
            .collect();
        assert_eq!(idents, vec![("x", 1), ("y", 2), ("z", 3)]);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("10 2.5 7.");
        assert_eq!(tokens[0].kind, TokenKind::IntConst);
        assert_eq!(tokens[1].kind, TokenKind::DoubleConst);
        assert_eq!(tokens[1].lexeme, "2.5");
        assert_eq!(tokens[2].kind, TokenKind::DoubleConst);
        assert_eq!(tokens[2].lexeme, "7.");
    }

    #[test]
    fn test_literals_keep_quotes() {
        let tokens = tokenize(r#"'a' "hi \"there\"" '\n'"#);
        assert_eq!(tokens[0].kind, TokenKind::CharConst);
        assert_eq!(tokens[0].lexeme, "'a'");
        assert_eq!(tokens[1].kind, TokenKind::StringLit);
        assert_eq!(tokens[1].lexeme, r#""hi \"there\"""#);
        assert!(tokens[1].valid);
        assert_eq!(tokens[2].lexeme, r"'\n'");
    }

    #[test]
    fn test_unterminated_literal_is_invalid() {
        let tokens = tokenize("\"abc\nint");
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert!(!tokens[0].valid);
        assert_eq!(tokens[1].kind, TokenKind::Int);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unknown_character() {
        let tokens = tokenize("a @ b");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert!(!tokens[1].valid);
        assert_eq!(tokens[2].lexeme, "b");
    }

    #[test]
    fn test_keywords_and_specifiers() {
        assert_eq!(
            kinds("if else while return break continue print int double char void iff"),
            vec![
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
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }
}

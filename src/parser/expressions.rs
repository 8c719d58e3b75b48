//! Expression parsing implementation
//!
//! Expressions are parsed by a precedence cascade, one rule per level, from
//! assignment (loosest) down to primary (tightest):
//!
//! ```text
//! assignment     ::= unary assign-op assignment | logical-or
//! logical-or     ::= logical-and ( '||' logical-and )*
//! logical-and    ::= bit-or ( '&&' bit-or )*
//! bit-or         ::= bit-xor ( '|' bit-xor )*
//! bit-xor        ::= bit-and ( '^' bit-and )*
//! bit-and        ::= equality ( '&' equality )*
//! equality       ::= relational ( ( '==' | '!=' ) relational )*
//! relational     ::= shift ( ( '>' | '<' | '>=' | '<=' ) shift )*
//! shift          ::= additive ( ( '<<' | '>>' ) additive )*
//! additive       ::= multiplicative ( ( '+' | '-' ) multiplicative )*
//! multiplicative ::= cast ( ( '*' | '/' | '%' ) cast )*
//! cast           ::= '(' specifiers ')' cast | unary
//! unary          ::= ( '+' | '-' | '!' ) cast | postfix
//! postfix        ::= primary ( '[' expression ']' | '(' arguments ')' )*
//! primary        ::= identifier | number | string | '(' expression ')'
//! ```
//!
//! Every binary level folds to the left. Assignment and cast are ordered
//! alternatives; both retry `unary` from the same cursor, so unary results are
//! memoized per start index.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::diagnostics::SyntaxError;
use crate::parser::parse::{PResult, ParseError, Parser, Rule};
use crate::parser::token::{Token, TokenKind};

type OperatorTable = &'static [(TokenKind, BinOp)];

const LOGICAL_OR: OperatorTable = &[(TokenKind::OrOr, BinOp::Or)];
const LOGICAL_AND: OperatorTable = &[(TokenKind::AndAnd, BinOp::And)];
const BIT_OR: OperatorTable = &[(TokenKind::Pipe, BinOp::BitOr)];
const BIT_XOR: OperatorTable = &[(TokenKind::Caret, BinOp::BitXor)];
const BIT_AND: OperatorTable = &[(TokenKind::Amp, BinOp::BitAnd)];
const EQUALITY: OperatorTable = &[(TokenKind::EqEq, BinOp::Eq), (TokenKind::NotEq, BinOp::Ne)];
const RELATIONAL: OperatorTable = &[
    (TokenKind::Gt, BinOp::Gt),
    (TokenKind::Lt, BinOp::Lt),
    (TokenKind::Ge, BinOp::Ge),
    (TokenKind::Le, BinOp::Le),
];
const SHIFT: OperatorTable = &[(TokenKind::LtLt, BinOp::Shl), (TokenKind::GtGt, BinOp::Shr)];
const ADDITIVE: OperatorTable = &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)];
const MULTIPLICATIVE: OperatorTable = &[
    (TokenKind::Star, BinOp::Mul),
    (TokenKind::Slash, BinOp::Div),
    (TokenKind::Percent, BinOp::Mod),
];

const ASSIGN_OPS: [TokenKind; 5] = [
    TokenKind::Eq,
    TokenKind::PlusEq,
    TokenKind::MinusEq,
    TokenKind::StarEq,
    TokenKind::SlashEq,
];

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Eq => Some(AssignOp::Assign),
        TokenKind::PlusEq => Some(AssignOp::AddAssign),
        TokenKind::MinusEq => Some(AssignOp::SubAssign),
        TokenKind::StarEq => Some(AssignOp::MulAssign),
        TokenKind::SlashEq => Some(AssignOp::DivAssign),
        _ => None,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self, at: usize) -> PResult<Expr> {
        self.parse_assignment(at)
    }

    /// Parse assignment (right-associative), falling back to logical-or
    pub(crate) fn parse_assignment(&mut self, at: usize) -> PResult<Expr> {
        let alternatives: [Rule<Expr>; 2] = [Parser::parse_assignment_form, Parser::parse_logical_or];
        self.nested(at, |p| p.first_of(at, &alternatives))
    }

    fn parse_assignment_form(&mut self, at: usize) -> PResult<Expr> {
        let (target, cursor) = self.parse_unary(at)?;
        let op = match assign_op(self.kind(cursor)) {
            Some(op) => op,
            None => return Err(self.expected(cursor, &ASSIGN_OPS)),
        };
        let (value, next) = self.parse_assignment(cursor + 1)?;

        Ok((Expr::assign(op, target, value), next))
    }

    fn parse_logical_or(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, LOGICAL_OR, Parser::parse_logical_and)
    }

    fn parse_logical_and(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, LOGICAL_AND, Parser::parse_bit_or)
    }

    fn parse_bit_or(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, BIT_OR, Parser::parse_bit_xor)
    }

    fn parse_bit_xor(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, BIT_XOR, Parser::parse_bit_and)
    }

    fn parse_bit_and(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, BIT_AND, Parser::parse_equality)
    }

    fn parse_equality(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, EQUALITY, Parser::parse_relational)
    }

    fn parse_relational(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, RELATIONAL, Parser::parse_shift)
    }

    fn parse_shift(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, SHIFT, Parser::parse_additive)
    }

    fn parse_additive(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, ADDITIVE, Parser::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self, at: usize) -> PResult<Expr> {
        self.fold_left(at, MULTIPLICATIVE, Parser::parse_cast)
    }

    /// `operand ( op operand )*`, folded to the left
    fn fold_left(&mut self, at: usize, operators: OperatorTable, operand: Rule<Expr>) -> PResult<Expr> {
        let (mut left, mut cursor) = operand(self, at)?;

        loop {
            let kind = self.kind(cursor);
            let op = match operators.iter().find(|(token, _)| *token == kind) {
                Some((_, op)) => *op,
                None => return Ok((left, cursor)),
            };
            let (right, next) = operand(self, cursor + 1)?;
            left = Expr::binary(op, left, right);
            cursor = next;
        }
    }

    /// Parse cast: `(specifiers) cast`, falling back to unary
    pub(crate) fn parse_cast(&mut self, at: usize) -> PResult<Expr> {
        let alternatives: [Rule<Expr>; 2] = [Parser::parse_cast_form, Parser::parse_unary];
        self.first_of(at, &alternatives)
    }

    fn parse_cast_form(&mut self, at: usize) -> PResult<Expr> {
        let cursor = self.expect(at, TokenKind::LParen)?;
        let (specifiers, cursor) = self.parse_specifiers(cursor)?;
        let cursor = self.expect(cursor, TokenKind::RParen)?;
        let (operand, next) = self.nested(cursor, |p| p.parse_cast(cursor))?;

        Ok((
            Expr::Cast {
                specifiers,
                operand: Box::new(operand),
            },
            next,
        ))
    }

    pub(crate) fn parse_unary(&mut self, at: usize) -> PResult<Expr> {
        if let Some(done) = self.memo_unary(at) {
            return done;
        }
        let result = self.parse_unary_uncached(at);
        self.store_unary(at, &result);
        result
    }

    fn parse_unary_uncached(&mut self, at: usize) -> PResult<Expr> {
        let op = match self.kind(at) {
            TokenKind::Plus => UnOp::Plus,
            TokenKind::Minus => UnOp::Minus,
            TokenKind::Bang => UnOp::Not,
            _ => return self.parse_postfix(at),
        };
        let (operand, next) = self.nested(at + 1, |p| p.parse_cast(at + 1))?;

        Ok((Expr::unary(op, operand), next))
    }

    /// Parse postfix: subscripts and calls chained after a primary
    fn parse_postfix(&mut self, at: usize) -> PResult<Expr> {
        let (mut expr, mut cursor) = self.parse_primary(at)?;

        loop {
            match self.kind(cursor) {
                TokenKind::LBracket => {
                    let (index, next) = self.parse_expression(cursor + 1)?;
                    cursor = self.expect(next, TokenKind::RBracket)?;
                    expr = Expr::ArraySubscript {
                        array: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    let (args, next) = self.parse_arguments(cursor + 1)?;
                    cursor = next;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                _ => return Ok((expr, cursor)),
            }
        }
    }

    /// Comma-separated assignment expressions up to and including `)`
    fn parse_arguments(&mut self, at: usize) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check(at, TokenKind::RParen) {
            return Ok((args, at + 1));
        }

        let mut cursor = at;
        loop {
            let (arg, next) = self.parse_assignment(cursor)?;
            args.push(arg);
            if self.check(next, TokenKind::Comma) {
                cursor = next + 1;
            } else {
                return Ok((args, self.expect(next, TokenKind::RParen)?));
            }
        }
    }

    fn parse_primary(&mut self, at: usize) -> PResult<Expr> {
        let token = self.token(at);

        if !token.valid && matches!(token.kind, TokenKind::CharConst | TokenKind::StringLit) {
            return Err(self.error(SyntaxError::UnterminatedLiteral, at));
        }

        match token.kind {
            TokenKind::Ident => Ok((Expr::Identifier(token.lexeme.clone()), at + 1)),
            TokenKind::IntConst | TokenKind::DoubleConst => match token.lexeme.parse::<f64>() {
                Ok(value) => Ok((constant(value, token), at + 1)),
                Err(_) => Err(self.expected_expression(at)),
            },
            TokenKind::CharConst => Ok((constant(char_value(&token.lexeme), token), at + 1)),
            TokenKind::StringLit => Ok((Expr::String(unquote(&token.lexeme).to_string()), at + 1)),
            TokenKind::LParen => {
                let (inner, next) = self.parse_expression(at + 1)?;
                let end = self.expect(next, TokenKind::RParen)?;
                Ok((Expr::Paren(Box::new(inner)), end))
            }
            _ => Err(self.expected_expression(at)),
        }
    }

    fn expected_expression(&self, at: usize) -> ParseError {
        self.error(SyntaxError::ExpectedExpression, at)
    }
}

fn constant(value: f64, token: &Token) -> Expr {
    Expr::Number(Number {
        value,
        text: token.lexeme.clone(),
    })
}

/// Code point of a character constant such as `'a'` or `'\n'`.
fn char_value(lexeme: &str) -> f64 {
    let inner = lexeme.strip_prefix('\'').unwrap_or(lexeme);
    let inner = inner.strip_suffix('\'').unwrap_or(inner);
    let mut chars = inner.chars();

    let value = match chars.next() {
        Some('\\') => match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some(other) => other,
            None => '\\',
        },
        Some(c) => c,
        None => '\0',
    };
    f64::from(u32::from(value))
}

/// String literal text without its surrounding quotes.
fn unquote(lexeme: &str) -> &str {
    let inner = lexeme.strip_prefix('"').unwrap_or(lexeme);
    inner.strip_suffix('"').unwrap_or(inner)
}

//! ZQC source parser
//!
//! This module turns source text (or a stored token stream) into an Abstract
//! Syntax Tree plus the syntax errors found along the way:
//! - [`token`]: the token contract shared by every stage
//! - [`lexer`]: tokenization (source text → tokens)
//! - [`parse`]: parsing (tokens → AST), split across the grammar modules
//! - [`ast`]: AST node definitions
//! - [`diagnostics`]: syntax errors and their rendering
//!
//! # Supported Language
//!
//! - Types: `int`, `double`, `char`, `void` (specifier lists, no qualifiers)
//! - Declarators: identifiers, arrays `a[N]`, functions `f(int x)`, in any nesting
//! - Statements: declarations, `if`/`else`, `while`, `return`, `break`, `continue`, blocks
//! - Expressions: assignment and compound assignment, logical, bitwise, relational,
//!   shift and arithmetic operators, casts, unary `+ - !`, subscripts and calls
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with ordered-alternative backtracking. The
//! parser never stops at the first error: each failing top-level item or block
//! item is recorded and skipped, so one run reports every independent error.

pub mod ast;
mod declarations;
mod declarator;
pub mod diagnostics;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod token;

pub use diagnostics::{Diagnostic, Diagnostics, SyntaxError};
pub use parse::{parse_source, parse_tokens, ParseError, ParseOutput, Parser, ParserConfig};
pub use token::{Token, TokenKind};

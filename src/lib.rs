//! # Introduction
//!
//! ZQC is the front end of a compiler for a small C-like language. It reads
//! source text, or a token stream stored in the token file format, and
//! produces a syntax tree together with every syntax error it could find.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST + Diagnostics → XML / source dump
//! ```
//!
//! 1. [`parser`] tokenizes the source and builds the AST, recovering from
//!    errors so that one run reports all of them.
//! 2. [`dump`] writes the results: the token file, the XML tree, or the tree
//!    rendered back to source.
//!
//! ```
//! use zqc::parser::parse_source;
//!
//! let output = parse_source("int a;\nint f(int x) { return x + 1; }");
//! assert!(!output.has_errors());
//! assert_eq!(output.unit.declarations.len(), 2);
//! ```

pub mod dump;
pub mod parser;

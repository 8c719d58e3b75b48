//! Declaration parsing implementation
//!
//! This module handles the two top-level forms and the specifier list they share:
//!
//! - Declarations: `int a, b[10] = x, f(int n);`
//! - Function definitions: `int main(void) { ... }`
//! - Declaration specifiers: one or more of `int`, `double`, `char`, `void`
//!
//! # Grammar
//!
//! ```text
//! declaration   ::= specifiers ( init-declarator ( ',' init-declarator )* )? ';'
//! init-declarator ::= declarator ( '=' assignment )?
//! function-def  ::= specifiers declarator compound     (declarator must be a function)
//! specifiers    ::= ( 'int' | 'double' | 'char' | 'void' )+
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::diagnostics::SyntaxError;
use crate::parser::parse::{PResult, Parser};
use crate::parser::token::{Token, TokenKind};

const SPECIFIERS: [TokenKind; 4] = [
    TokenKind::Int,
    TokenKind::Double,
    TokenKind::Char,
    TokenKind::Void,
];

impl Parser {
    /// Parse a non-empty run of declaration specifiers
    pub(crate) fn parse_specifiers(&self, at: usize) -> PResult<Vec<Token>> {
        let mut cursor = at;
        while self.kind(cursor).is_specifier() {
            cursor += 1;
        }

        if cursor == at {
            return Err(self.expected(at, &SPECIFIERS));
        }
        Ok((self.tokens[at..cursor].to_vec(), cursor))
    }

    /// Parse a declaration ending in `;`
    pub(crate) fn parse_declaration(&mut self, at: usize) -> PResult<Declaration> {
        let (specifiers, mut cursor) = self.parse_specifiers(at)?;
        let mut declarators = Vec::new();
        let mut initializers = Vec::new();

        if !self.check(cursor, TokenKind::Semicolon) {
            loop {
                let (declarator, next) = self.parse_declarator(cursor)?;
                declarators.push(declarator);
                cursor = next;

                if self.check(cursor, TokenKind::Eq) {
                    let (value, next) = self.parse_assignment(cursor + 1)?;
                    initializers.push(Some(value));
                    cursor = next;
                } else {
                    initializers.push(None);
                }

                if !self.check(cursor, TokenKind::Comma) {
                    break;
                }
                cursor += 1;
            }
        }

        let end = self.expect(cursor, TokenKind::Semicolon)?;
        Ok((
            Declaration {
                root: DeclRoot {
                    specifiers,
                    declarators,
                    initializers,
                },
                body: None,
            },
            end,
        ))
    }

    /// Parse a function definition: specifiers, a function declarator and a body
    pub(crate) fn parse_function_definition(&mut self, at: usize) -> PResult<Declaration> {
        let (specifiers, start) = self.parse_specifiers(at)?;
        let (declarator, cursor) = self.parse_declarator(start)?;

        // Fails shallow so that the declaration's error wins for `int a`.
        if !declarator.is_function() {
            return Err(self.error(SyntaxError::InvalidDeclarator, start));
        }

        let (body, end) = self.parse_compound(cursor)?;
        Ok((
            Declaration {
                root: DeclRoot {
                    specifiers,
                    declarators: vec![declarator],
                    initializers: vec![None],
                },
                body: Some(body),
            },
            end,
        ))
    }

    /// A declaration appearing as a block item
    pub(crate) fn parse_block_declaration(&mut self, at: usize) -> PResult<Stmt> {
        let (declaration, end) = self.parse_declaration(at)?;
        Ok((Stmt::Declaration(declaration), end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(source: &str) -> Declaration {
        let mut parser = Parser::from_source(source);
        let (declaration, end) = parser.parse_declaration(0).expect("declaration should parse");
        assert_eq!(end, parser.eof_index());
        declaration
    }

    #[test]
    fn test_specifier_sequence() {
        let parser = Parser::from_source("int double x");
        let (specifiers, next) = parser.parse_specifiers(0).unwrap();
        assert_eq!(specifiers.len(), 2);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_missing_specifier() {
        let parser = Parser::from_source("x");
        let error = parser.parse_specifiers(0).unwrap_err();
        assert_eq!(error.to_string(), "line 1: expected one of 'int', 'double', 'char', 'void' at 'x'");
    }

    #[test]
    fn test_bare_specifier_declaration() {
        let decl = declaration("int;");
        assert!(decl.root.declarators.is_empty());
        assert!(decl.root.initializers.is_empty());
    }

    #[test]
    fn test_initializers_parallel_declarators() {
        let decl = declaration("int a = 1, b, c[2] = x;");
        let names: Vec<_> = decl.root.declarators.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(
            decl.root.initializers,
            vec![Some(Expr::number(1.0)), None, Some(Expr::ident("x"))]
        );
    }

    #[test]
    fn test_function_definition_requires_function_declarator() {
        let mut parser = Parser::from_source("int a { }");
        let error = parser.parse_function_definition(0).unwrap_err();
        assert_eq!(error.error(), &SyntaxError::InvalidDeclarator);
        assert_eq!(error.depth, 1);
    }

    #[test]
    fn test_function_definition() {
        let mut parser = Parser::from_source("void f(int a, double b) { return; }");
        let (decl, end) = parser.parse_function_definition(0).unwrap();
        assert_eq!(end, parser.eof_index());
        assert_eq!(decl.root.initializers, vec![None]);
        match &decl.root.declarators[0] {
            Declarator::Function { params, .. } => assert_eq!(params.len(), 2),
            other => panic!("expected function declarator, got {:?}", other),
        }
        assert_eq!(decl.body.unwrap().items, vec![Stmt::Return(None)]);
    }
}

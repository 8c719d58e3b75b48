// Integration tests for the parser: concrete programs and their trees

use zqc::parser::ast::*;
use zqc::parser::diagnostics::{Delimiter, Placement};
use zqc::parser::{parse_source, Parser, SyntaxError, TokenKind};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse_ok(source: &str) -> CompilationUnit {
    let output = parse_source(source);
    assert!(
        !output.has_errors(),
        "unexpected diagnostics for {:?}:\n{}",
        source,
        output.diagnostics
    );
    output.unit
}

fn ident_name(declarator: &Declarator) -> &str {
    match declarator {
        Declarator::Identifier(token) => &token.lexeme,
        other => panic!("expected identifier declarator, got {:?}", other),
    }
}

#[test]
fn test_simple_declaration() {
    init();
    let unit = parse_ok("int a;");

    assert_eq!(unit.declarations.len(), 1);
    let decl = &unit.declarations[0];
    assert!(decl.body.is_none());
    assert_eq!(decl.root.specifiers.len(), 1);
    assert_eq!(decl.root.specifiers[0].kind, TokenKind::Int);
    assert_eq!(decl.root.declarators.len(), 1);
    assert_eq!(ident_name(&decl.root.declarators[0]), "a");
    assert_eq!(decl.root.initializers, vec![None]);
}

#[test]
fn test_array_declaration() {
    init();
    let unit = parse_ok("int a[10];");

    match &unit.declarations[0].root.declarators[0] {
        Declarator::Array { base, size } => {
            assert_eq!(ident_name(base), "a");
            assert_eq!(size, &Some(Expr::number(10.0)));
        }
        other => panic!("expected array declarator, got {:?}", other),
    }
}

#[test]
fn test_function_definition() {
    init();
    let unit = parse_ok("int f(int a, int b) { return a + b; }");

    assert_eq!(unit.declarations.len(), 1);
    let decl = &unit.declarations[0];
    match &decl.root.declarators[0] {
        Declarator::Function { base, params } => {
            assert_eq!(ident_name(base), "f");
            assert_eq!(params.len(), 2);
            for (param, name) in params.iter().zip(["a", "b"]) {
                assert_eq!(param.specifiers[0].kind, TokenKind::Int);
                assert_eq!(ident_name(&param.declarators[0]), name);
            }
        }
        other => panic!("expected function declarator, got {:?}", other),
    }

    let body = decl.body.as_ref().expect("function body");
    assert_eq!(
        body.items,
        vec![Stmt::Return(Some(Expr::binary(
            BinOp::Add,
            Expr::ident("a"),
            Expr::ident("b")
        )))]
    );
    assert_eq!(unit.functions().count(), 1);
}

#[test]
fn test_missing_semicolon_is_reported_after_previous_token() {
    init();
    let output = parse_source("int a");

    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics.as_slice()[0];
    match &diagnostic.error {
        SyntaxError::ExpectedToken {
            expected,
            placement,
        } => {
            assert!(expected.contains(TokenKind::Semicolon));
            assert_eq!(*placement, Placement::After);
        }
        other => panic!("expected missing token, got {:?}", other),
    }
    assert_eq!(diagnostic.position, 1);
    assert_eq!(diagnostic.to_string(), "line 1: expected ';' after 'a'");
}

#[test]
fn test_if_else_with_blocks() {
    init();
    let unit = parse_ok("void f() { if (x) { y = 1; } else { y = 2; } }");
    let body = unit.declarations[0].body.as_ref().expect("function body");

    let assign = |value: f64| {
        Stmt::Compound(Compound {
            items: vec![Stmt::Expression(Expr::assign(
                AssignOp::Assign,
                Expr::ident("y"),
                Expr::number(value),
            ))],
        })
    };
    assert_eq!(
        body.items,
        vec![Stmt::If {
            cond: Expr::ident("x"),
            then_branch: Box::new(assign(1.0)),
            else_branch: Some(Box::new(assign(2.0))),
        }]
    );
}

#[test]
fn test_mismatched_bracket_recovers() {
    init();
    let output = parse_source("int a[;\nint b;");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics.as_slice()[0].error,
        SyntaxError::MismatchedDelimiter {
            delimiter: Delimiter::Bracket
        }
    );
    assert_eq!(output.unit.declarations.len(), 1);
    assert_eq!(output.unit.declarations[0].root.declarators[0].name(), "b");
}

#[test]
fn test_deeper_alternative_wins() {
    init();
    // Every statement form but `while` stops at the first token; `while` gets
    // as far as the missing right-hand side.
    let output = parse_source("void f() { while (x) y = ; }");

    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.message(), "expected expression at ';'");
    assert_eq!(diagnostic.position, 11);
}

#[test]
fn test_deeper_failure_inside_initializer_wins() {
    init();
    let output = parse_source("int a = 1 +;");

    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.error, SyntaxError::ExpectedExpression);
    assert_eq!(diagnostic.position, 5);
}

#[test]
fn test_parse_is_deterministic() {
    init();
    let source = "int a = (double) b * c;\nint f(void) { while (a) { a -= 1; if (a == 3) break; } x = ; }";
    let tokens = zqc::parser::lexer::tokenize(source);

    let first = Parser::new(tokens.clone()).parse();
    let second = Parser::new(tokens).parse();

    assert_eq!(first.unit, second.unit);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.diagnostics.len(), 1);
}

#[test]
fn test_nested_declarators() {
    init();
    let unit = parse_ok("char table[4][8], lookup(int key, double weights[]);");
    let declarators = &unit.declarations[0].root.declarators;

    assert_eq!(declarators.len(), 2);
    assert!(matches!(&declarators[0], Declarator::Array { base, .. } if matches!(**base, Declarator::Array { .. })));
    match &declarators[1] {
        Declarator::Function { params, .. } => {
            assert!(matches!(
                params[1].declarators[0],
                Declarator::Array { size: None, .. }
            ));
        }
        other => panic!("expected function declarator, got {:?}", other),
    }
}

#[test]
fn test_block_declarations_and_statements() {
    init();
    let unit = parse_ok(
        "int main() {\n    int i = 0, n = 10;\n    double total;\n    while (i < n) {\n        total += f(i) * 2.5;\n        i = i + 1;\n        continue;\n    }\n    ;\n    return total;\n}",
    );
    let items = &unit.declarations[0].body.as_ref().expect("body").items;

    assert_eq!(items.len(), 5);
    assert!(matches!(items[0], Stmt::Declaration(_)));
    assert!(matches!(items[1], Stmt::Declaration(_)));
    assert!(matches!(items[2], Stmt::While { .. }));
    assert_eq!(items[3], Stmt::Empty);
    assert_eq!(items[4], Stmt::Return(Some(Expr::ident("total"))));
}

#[test]
fn test_into_result() {
    init();
    assert!(parse_source("int a;").into_result().is_ok());

    let diagnostics = parse_source("int a").into_result().unwrap_err();
    assert_eq!(diagnostics.len(), 1);
}

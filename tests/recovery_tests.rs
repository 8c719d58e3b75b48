// Integration tests for error recovery: several errors per run, bounded skipping

use indoc::indoc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use zqc::parser::ast::*;
use zqc::parser::diagnostics::Delimiter;
use zqc::parser::{parse_source, Parser, ParserConfig, SyntaxError};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_reports_independent_top_level_errors() {
    init();
    let output = parse_source(indoc! {"
        int a
        int b;
        int c = ;
        int d;
    "});

    let lines: Vec<_> = output.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 3]);
    assert_eq!(
        output.diagnostics.as_slice()[0].message(),
        "expected ';' after 'a'"
    );
    assert_eq!(
        output.diagnostics.as_slice()[1].error,
        SyntaxError::ExpectedExpression
    );

    let names: Vec<_> = output
        .unit
        .declarations
        .iter()
        .map(|decl| decl.root.declarators[0].name().to_string())
        .collect();
    assert_eq!(names, vec!["b", "d"]);
}

#[test]
fn test_block_recovery_keeps_later_statements() {
    init();
    let output = parse_source(indoc! {"
        int main() {
            while (x) {
                y = = 2;
            }
            z = 3;
        }
    "});

    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.line, 3);
    assert_eq!(diagnostic.message(), "expected expression at '='");

    let body = output.unit.declarations[0].body.as_ref().expect("body");
    assert_eq!(body.items.len(), 2);
    match &body.items[0] {
        Stmt::While { body, .. } => {
            assert_eq!(**body, Stmt::Compound(Compound::default()));
        }
        other => panic!("expected while, got {:?}", other),
    }
    assert_eq!(
        body.items[1],
        Stmt::Expression(Expr::assign(
            AssignOp::Assign,
            Expr::ident("z"),
            Expr::number(3.0)
        ))
    );
}

#[test]
fn test_recovery_never_crosses_closing_brace() {
    init();
    let output = parse_source("void f() { a b c } int g;");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics.as_slice()[0].message(),
        "expected ';' at 'b'"
    );
    assert_eq!(output.unit.declarations.len(), 2);
    assert!(output.unit.declarations[0].body.is_some());
    assert_eq!(output.unit.declarations[1].root.declarators[0].name(), "g");
}

#[test]
fn test_one_error_per_bad_statement() {
    init();
    let output = parse_source(indoc! {"
        int main() {
            x = ;
            y = 1;
            return z
        }
    "});

    let messages: Vec<_> = output.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "line 2: expected expression at ';'",
            "line 4: expected ';' after 'z'",
        ]
    );
    let body = output.unit.declarations[0].body.as_ref().expect("body");
    assert_eq!(body.items.len(), 2);
    assert_eq!(body.items[1], Stmt::Return(Some(Expr::ident("z"))));
}

#[test]
fn test_unclosed_function_body_keeps_its_diagnostics() {
    init();
    let output = parse_source("int main() {\n  x = ;\n  y = 1;\n");

    let messages: Vec<_> = output.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "line 1: mismatched brace at '{'",
            "line 2: expected expression at ';'",
        ]
    );
    assert_eq!(
        output.diagnostics.as_slice()[0].error,
        SyntaxError::MismatchedDelimiter {
            delimiter: Delimiter::Brace
        }
    );
    assert_eq!(output.diagnostics.as_slice()[0].position, 4);

    assert_eq!(output.unit.declarations.len(), 1);
    let body = output.unit.declarations[0].body.as_ref().expect("body");
    assert_eq!(
        body.items,
        vec![Stmt::Expression(Expr::assign(
            AssignOp::Assign,
            Expr::ident("y"),
            Expr::number(1.0)
        ))]
    );
}

#[test]
fn test_one_diagnostic_for_error_after_closing_paren() {
    init();
    let output = parse_source(indoc! {"
        void f() {
          if (g(x, y)) q = = 1;
        }
    "});

    assert_eq!(output.diagnostics.len(), 1, "{}", output.diagnostics);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.to_string(), "line 2: expected expression at '='");
    assert_eq!(diagnostic.position, 16);
}

#[test]
fn test_unterminated_string_is_reported() {
    init();
    let output = parse_source(indoc! {r#"
        int main() {
          s = "abc;
          return 0;
        }
    "#});

    assert_eq!(output.diagnostics.len(), 1, "{}", output.diagnostics);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.error, SyntaxError::UnterminatedLiteral);
    assert_eq!(diagnostic.to_string(), "line 2: unterminated literal at '\"abc;'");

    let body = output.unit.declarations[0].body.as_ref().expect("body");
    assert_eq!(body.items, vec![Stmt::Return(Some(Expr::number(0.0)))]);
}

#[test]
fn test_nesting_limit_is_reported_not_overflowed() {
    init();
    let handle = std::thread::Builder::new()
        .stack_size(16 * 1024 * 1024)
        .spawn(|| {
            let source = format!("int x = {}1{};", "(".repeat(5000), ")".repeat(5000));
            parse_source(&source)
        })
        .expect("spawn parser thread");
    let output = handle.join().expect("parser thread panicked");

    // The closing parens left over after the failure add nothing.
    assert_eq!(output.diagnostics.len(), 1, "{}", output.diagnostics);
    assert!(matches!(
        output.diagnostics.as_slice()[0].error,
        SyntaxError::NestingTooDeep { .. }
    ));
}

#[test]
fn test_custom_nesting_limit() {
    init();
    let source = "int f() { return ((((((1)))))); }";

    let relaxed = Parser::from_source(source).parse();
    assert!(!relaxed.has_errors());

    let strict = Parser::from_source(source)
        .with_config(ParserConfig { max_nesting: 4 })
        .parse();
    assert!(strict
        .diagnostics
        .iter()
        .any(|d| d.error == SyntaxError::NestingTooDeep { limit: 4 }));
}

#[test]
fn test_garbage_always_terminates() {
    init();
    let pieces = [
        "int", "double", "x", "y", "1", "2.5", "(", ")", "[", "]", "{", "}", ";", ",", "=", "+",
        "*", "==", "if", "else", "while", "return", "break", "\n", "'c'", "\"s\"", "@",
    ];

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let source: Vec<&str> = (0..120)
            .map(|_| *pieces.choose(&mut rng).expect("pieces is not empty"))
            .collect();
        let source = source.join(" ");

        let parser = Parser::from_source(&source);
        let token_count = parser.tokens().len();
        let output = parser.parse();

        assert!(
            output.diagnostics.len() <= token_count,
            "seed {}: {} diagnostics for {} tokens",
            seed,
            output.diagnostics.len(),
            token_count
        );
        for diagnostic in &output.diagnostics {
            assert!(diagnostic.position < token_count, "seed {}", seed);
        }
    }
}

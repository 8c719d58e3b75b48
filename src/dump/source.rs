//! Source rendering of the syntax tree
//!
//! Prints exactly the tokens a node was parsed from, separated by spaces, so
//! re-lexing the output gives back the original token sequence. Statements
//! are laid out one per line with four-space indentation.

use crate::parser::ast::*;
use crate::parser::token::Token;
use std::fmt;

/// Render a compilation unit as source text.
pub fn render(unit: &CompilationUnit) -> String {
    let mut writer = SourceWriter::default();
    for declaration in &unit.declarations {
        writer.declaration(declaration);
    }
    writer.out
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn specifiers(specifiers: &[Token]) -> String {
    specifiers
        .iter()
        .map(|token| token.lexeme.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Number(number) => write!(f, "{}", number.text),
            Expr::String(text) => write!(f, "\"{}\"", text),
            Expr::Paren(inner) => write!(f, "( {} )", inner),
            Expr::ArraySubscript { array, index } => write!(f, "{} [ {} ]", array, index),
            Expr::Call { callee, args } => {
                write!(f, "{} ( ", callee)?;
                join(f, args, " , ")?;
                write!(f, " )")
            }
            Expr::Unary { op, operand } => write!(f, "{} {}", op.symbol(), operand),
            Expr::Cast {
                specifiers: specs,
                operand,
            } => write!(f, "( {} ) {}", specifiers(specs), operand),
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op.symbol(), right),
            Expr::Assign { op, left, right } => write!(f, "{} {} {}", left, op.symbol(), right),
        }
    }
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declarator::Identifier(token) => write!(f, "{}", token.lexeme),
            Declarator::Array { base, size: Some(size) } => write!(f, "{} [ {} ]", base, size),
            Declarator::Array { base, size: None } => write!(f, "{} [ ]", base),
            Declarator::Function { base, params } => {
                write!(f, "{} ( ", base)?;
                join(f, params, " , ")?;
                write!(f, " )")
            }
        }
    }
}

/// Specifiers and declarators, without the trailing `;`
impl fmt::Display for DeclRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", specifiers(&self.specifiers))?;
        for (i, declarator) in self.declarators.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { " " } else { " , " }, declarator)?;
            if let Some(Some(initializer)) = self.initializers.get(i) {
                write!(f, " = {}", initializer)?;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match &declaration.body {
            Some(body) => {
                self.line(&declaration.root.to_string());
                self.compound(body);
            }
            None => self.line(&format!("{} ;", declaration.root)),
        }
    }

    fn compound(&mut self, compound: &Compound) {
        self.line("{");
        self.depth += 1;
        for item in &compound.items {
            self.stmt(item);
        }
        self.depth -= 1;
        self.line("}");
    }

    /// Statement bodies of `if`/`else`/`while` go one level deeper unless
    /// they are blocks.
    fn body(&mut self, stmt: &Stmt) {
        if let Stmt::Compound(compound) = stmt {
            self.compound(compound);
        } else {
            self.depth += 1;
            self.stmt(stmt);
            self.depth -= 1;
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(declaration) => self.declaration(declaration),
            Stmt::Compound(compound) => self.compound(compound),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("if ( {} )", cond));
                self.body(then_branch);
                if let Some(else_branch) = else_branch {
                    self.line("else");
                    self.body(else_branch);
                }
            }
            Stmt::While { cond, body } => {
                self.line(&format!("while ( {} )", cond));
                self.body(body);
            }
            Stmt::Return(Some(value)) => self.line(&format!("return {} ;", value)),
            Stmt::Return(None) => self.line("return ;"),
            Stmt::Break => self.line("break ;"),
            Stmt::Continue => self.line("continue ;"),
            Stmt::Empty => self.line(";"),
            Stmt::Expression(expr) => self.line(&format!("{} ;", expr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use indoc::indoc;

    #[test]
    fn test_render_function() {
        let output = parse_source("int f(int a,int b){if(a<b)return a+b;else{x=f(a,b)[1];}}");
        assert!(!output.has_errors());
        assert_eq!(
            render(&output.unit),
            indoc! {"
                int f ( int a , int b )
                {
                    if ( a < b )
                        return a + b ;
                    else
                    {
                        x = f ( a , b ) [ 1 ] ;
                    }
                }
            "}
        );
    }

    #[test]
    fn test_render_declaration_list() {
        let output = parse_source("double a = -1.5, b[], c;");
        assert_eq!(render(&output.unit), "double a = - 1.5 , b [ ] , c ;\n");
    }

    #[test]
    fn test_constants_keep_their_spelling() {
        let output = parse_source("char c = '\\n'; double d = 1.50 + 7.;");
        assert!(!output.has_errors());
        assert_eq!(
            render(&output.unit),
            "char c = '\\n' ;\ndouble d = 1.50 + 7. ;\n"
        );
    }
}

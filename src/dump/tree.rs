//! XML rendering of the syntax tree
//!
//! Every node kind has its own element: each binary operator, each
//! assignment form and each unary operator is told apart by its tag rather
//! than by an attribute. Operands and optional parts sit in named wrapper
//! elements (`<left-operand>`, `<if-body>`, `<size>`, ...), children appear
//! in field order, and each level is indented by four spaces. Nodes without
//! children are written as an empty open/close pair.

use crate::dump::tokens::escape;
use crate::parser::ast::*;
use crate::parser::token::Token;

/// Render a compilation unit as an XML document.
pub fn render(unit: &CompilationUnit) -> String {
    let mut writer = TreeWriter::default();
    writer.open("compilation-unit");
    for declaration in &unit.declarations {
        writer.declaration(declaration);
    }
    writer.close("compilation-unit");
    writer.out
}

fn binary_tag(op: BinOp) -> &'static str {
    match op {
        BinOp::Mul => "expr-multi",
        BinOp::Div => "expr-div",
        BinOp::Mod => "expr-mod",
        BinOp::Add => "add",
        BinOp::Sub => "minus",
        BinOp::Shl => "l-shift",
        BinOp::Shr => "r-shift",
        BinOp::Gt => "greater",
        BinOp::Lt => "less",
        BinOp::Ge => "greater-equal",
        BinOp::Le => "less-equal",
        BinOp::Eq => "equality",
        BinOp::Ne => "inequality",
        BinOp::BitOr => "bit-or",
        BinOp::BitXor => "bit-xor",
        BinOp::BitAnd => "bit-and",
        BinOp::And => "logical-and",
        BinOp::Or => "logical-or",
    }
}

fn assign_tag(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "assign",
        AssignOp::AddAssign => "add-assign",
        AssignOp::SubAssign => "sub-assign",
        AssignOp::MulAssign => "multi-assign",
        AssignOp::DivAssign => "div-assign",
    }
}

fn unary_tag(op: UnOp) -> &'static str {
    match op {
        UnOp::Plus => "expr-unary-plus",
        UnOp::Minus => "expr-unary-minus",
        UnOp::Not => "logical-not",
    }
}

#[derive(Default)]
struct TreeWriter {
    out: String,
    depth: usize,
}

impl TreeWriter {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
    }

    fn open(&mut self, tag: &str) {
        self.indent();
        self.out.push_str(&format!("<{}>\n", tag));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.indent();
        self.out.push_str(&format!("</{}>\n", tag));
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.indent();
        self.out.push_str(&format!("<{}>{}</{}>\n", tag, escape(text), tag));
    }

    fn empty(&mut self, tag: &str) {
        self.open(tag);
        self.close(tag);
    }

    fn wrap(&mut self, tag: &str, expr: &Expr) {
        self.open(tag);
        self.expr(expr);
        self.close(tag);
    }

    fn wrap_stmt(&mut self, tag: &str, stmt: &Stmt) {
        self.open(tag);
        self.stmt(stmt);
        self.close(tag);
    }

    fn declaration(&mut self, declaration: &Declaration) {
        self.open("declaration");
        self.decl_root(&declaration.root);
        if let Some(body) = &declaration.body {
            self.open("body");
            self.compound(body);
            self.close("body");
        }
        self.close("declaration");
    }

    fn decl_root(&mut self, root: &DeclRoot) {
        self.open("decl-root");

        self.open("decl-specifiers");
        for token in &root.specifiers {
            self.leaf("specifiers", &token.lexeme);
        }
        self.close("decl-specifiers");

        self.open("decl-declarators");
        for declarator in &root.declarators {
            self.declarator(declarator);
        }
        self.close("decl-declarators");

        // One entry per declarator, so initializers stay paired with them.
        self.open("decl-initializer");
        for initializer in &root.initializers {
            match initializer {
                Some(expr) => self.expr(expr),
                None => self.empty("no-initializer"),
            }
        }
        self.close("decl-initializer");

        self.close("decl-root");
    }

    fn declarator(&mut self, declarator: &Declarator) {
        match declarator {
            Declarator::Identifier(token) => self.leaf("decl-identifier", &token.lexeme),
            Declarator::Array { base, size } => {
                self.open("decl-array");
                self.open("array");
                self.declarator(base);
                self.close("array");
                match size {
                    Some(size) => self.wrap("size", size),
                    None => self.empty("size"),
                }
                self.close("decl-array");
            }
            Declarator::Function { base, params } => {
                self.open("decl-func");
                self.open("callee");
                self.declarator(base);
                self.close("callee");
                self.open("parameters");
                for param in params {
                    self.decl_root(param);
                }
                self.close("parameters");
                self.close("decl-func");
            }
        }
    }

    fn compound(&mut self, compound: &Compound) {
        self.open("compound-statement");
        for item in &compound.items {
            self.stmt(item);
        }
        self.close("compound-statement");
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
                self.open("if-statement");
                self.wrap("condition", cond);
                self.wrap_stmt("if-body", then_branch);
                if let Some(else_branch) = else_branch {
                    self.wrap_stmt("else-body", else_branch);
                }
                self.close("if-statement");
            }
            Stmt::While { cond, body } => {
                self.open("while-statement");
                self.wrap("condition", cond);
                self.wrap_stmt("body", body);
                self.close("while-statement");
            }
            Stmt::Return(value) => {
                self.open("return-statement");
                if let Some(value) = value {
                    self.wrap("value", value);
                }
                self.close("return-statement");
            }
            Stmt::Break => self.empty("break-statement"),
            Stmt::Continue => self.empty("continue-statement"),
            Stmt::Empty => self.empty("empty-statement"),
            Stmt::Expression(expr) => self.wrap("expression-statement", expr),
        }
    }

    fn operands(&mut self, tag: &str, left: &Expr, right: &Expr) {
        self.open(tag);
        self.wrap("left-operand", left);
        self.wrap("right-operand", right);
        self.close(tag);
    }

    fn types(&mut self, specifiers: &[Token]) {
        self.open("types");
        for token in specifiers {
            self.leaf("type", &token.lexeme);
        }
        self.close("types");
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => self.leaf("expr-identifier", name),
            Expr::Number(number) => self.leaf("expr-number", &number.text),
            Expr::String(text) => self.leaf("expr-string", text),
            Expr::Paren(inner) => self.wrap("expr-paren", inner),
            Expr::ArraySubscript { array, index } => {
                self.open("expr-array-sub");
                self.wrap("array", array);
                self.wrap("subscript", index);
                self.close("expr-array-sub");
            }
            Expr::Call { callee, args } => {
                self.open("expr-func-call");
                self.wrap("func", callee);
                self.open("args");
                for arg in args {
                    self.expr(arg);
                }
                self.close("args");
                self.close("expr-func-call");
            }
            Expr::Unary { op, operand } => {
                let tag = unary_tag(*op);
                self.open(tag);
                self.wrap("operand", operand);
                self.close(tag);
            }
            Expr::Cast {
                specifiers,
                operand,
            } => {
                self.open("expr-cast");
                self.types(specifiers);
                self.wrap("operand", operand);
                self.close("expr-cast");
            }
            Expr::Binary { op, left, right } => self.operands(binary_tag(*op), left, right),
            Expr::Assign { op, left, right } => self.operands(assign_tag(*op), left, right),
        }
    }
}

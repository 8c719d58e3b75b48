// AST (Abstract Syntax Tree) definitions for the ZQC front end

use super::token::Token;

/// Binary operators, one per precedence-cascade operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Multiplicative
    Mul,
    Div,
    Mod,
    // Additive
    Add,
    Sub,
    // Shift
    Shl,
    Shr,
    // Relational
    Gt,
    Lt,
    Ge,
    Le,
    // Equality
    Eq,
    Ne,
    // Bitwise
    BitOr,
    BitXor,
    BitAnd,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,  // +x
    Minus, // -x
    Not,   // !x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Plus => "+",
            UnOp::Minus => "-",
            UnOp::Not => "!",
        }
    }
}

/// Simple and compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }
}

/// A constant normalized to `f64`, with its spelling in the source (`7.`,
/// `1.50`, `'\n'`).
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub value: f64,
    pub text: String,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    /// Integer, double and character constants
    Number(Number),
    /// String literal text without the surrounding quotes
    String(String),
    Paren(Box<Expr>),
    ArraySubscript {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Cast {
        specifiers: Vec<Token>,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    /// A constant spelled the way `f64` displays it.
    pub fn number(value: f64) -> Self {
        Expr::Number(Number {
            value,
            text: value.to_string(),
        })
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assign(op: AssignOp, left: Expr, right: Expr) -> Self {
        Expr::Assign {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

/// The part of a declaration that names what is declared and gives its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Declarator {
    Identifier(Token),
    Array {
        base: Box<Declarator>,
        size: Option<Expr>,
    },
    Function {
        base: Box<Declarator>,
        params: Vec<DeclRoot>,
    },
}

impl Declarator {
    /// Name of the innermost identifier.
    pub fn name(&self) -> &str {
        match self {
            Declarator::Identifier(token) => &token.lexeme,
            Declarator::Array { base, .. } | Declarator::Function { base, .. } => base.name(),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Declarator::Function { .. })
    }
}

/// Specifiers plus the declarators (and their initializers) they apply to.
///
/// `initializers` is either the same length as `declarators` or, for a bare
/// `int;`, both are empty. Function parameters have exactly one declarator and
/// no initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclRoot {
    pub specifiers: Vec<Token>,
    pub declarators: Vec<Declarator>,
    pub initializers: Vec<Option<Expr>>,
}

impl DeclRoot {
    pub fn parameter(specifiers: Vec<Token>, declarator: Declarator) -> Self {
        DeclRoot {
            specifiers,
            declarators: vec![declarator],
            initializers: Vec::new(),
        }
    }
}

/// A declaration, or a function definition when `body` is present
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub root: DeclRoot,
    pub body: Option<Compound>,
}

/// `{ ... }` block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub items: Vec<Stmt>,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    Compound(Compound),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    Empty,
    Expression(Expr),
}

/// Parse root: every top-level declaration and function definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub declarations: Vec<Declaration>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        CompilationUnit::default()
    }

    /// Top-level declarations that carry a body.
    pub fn functions(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|decl| decl.body.is_some())
    }
}

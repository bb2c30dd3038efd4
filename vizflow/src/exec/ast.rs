//! Abstract syntax for the transform script language.

use crate::dataset::Scalar;

/// A parsed statement with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = expr`
    Assign {
        /// Target variable name.
        name: String,
        /// Right-hand side.
        expr: Expr,
        /// Source line of the statement.
        line: u32,
    },
    /// A bare expression evaluated for its effect (e.g. a chart call).
    Expr {
        /// The expression.
        expr: Expr,
        /// Source line of the statement.
        line: u32,
    },
}

impl Stmt {
    /// Source line of the statement.
    #[must_use]
    pub const fn line(&self) -> u32 {
        match self {
            Self::Assign { line, .. } | Self::Expr { line, .. } => *line,
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal scalar (null, bool, int, float, string).
    Literal(Scalar),
    /// Variable reference (or column reference inside row expressions).
    Ident(String),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// `{key: value, ...}`
    Record(Vec<(String, Expr)>),
    /// Unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// Binary operator application.
    Binary {
        /// The operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Free function call, e.g. `bar_chart(df, "x", "y", path)`.
    Call {
        /// Function name.
        name: String,
        /// Arguments.
        args: Vec<Arg>,
    },
    /// Method call on a value, e.g. `df.filter(price > 10)`.
    Method {
        /// Receiver expression.
        recv: Box<Expr>,
        /// Method name.
        name: String,
        /// Arguments.
        args: Vec<Arg>,
    },
}

/// A call argument, optionally keyword-named (`total = price * qty`).
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Keyword name, when given.
    pub name: Option<String>,
    /// Argument expression. Row-scoped methods (`assign`, `filter`)
    /// evaluate this lazily per row.
    pub expr: Expr,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Boolean negation.
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinOp {
    /// Operator spelling for error messages.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

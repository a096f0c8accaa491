//! Expression nodes

use std::fmt;

use super::value::Value;

/// Source position of a node (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Binary operator taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Xor => "xor",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operator taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Macal value types, used in parameter annotations, return types, and the
/// `IsXxx(x)` type-check builtins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Integer,
    Float,
    String,
    Bool,
    Array,
    Record,
    Function,
    Params,
    Variable,
    Nil,
    /// Unannotated parameters accept any type
    Any,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeName::Integer => "integer",
            TypeName::Float => "float",
            TypeName::String => "string",
            TypeName::Bool => "bool",
            TypeName::Array => "array",
            TypeName::Record => "record",
            TypeName::Function => "function",
            TypeName::Params => "params",
            TypeName::Variable => "variable",
            TypeName::Nil => "nil",
            TypeName::Any => "any",
        };
        f.write_str(name)
    }
}

/// An expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    /// `name[i]`, `name[i][j]`, ...
    Indexed {
        name: String,
        index: Vec<Expr>,
        span: Span,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    /// A call through an indexed variable: `handlers[kind](args)`
    IndexedCall {
        target: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    /// `IsString(x)`, `IsInt(x)`, ...
    TypeCheck {
        check: TypeName,
        expr: Box<Expr>,
        span: Span,
    },
    /// `Type(x)`
    TypeQuery {
        expr: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Variable { span, .. }
            | Expr::Indexed { span, .. }
            | Expr::Call { span, .. }
            | Expr::IndexedCall { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::TypeCheck { span, .. }
            | Expr::TypeQuery { span, .. } => *span,
        }
    }

    /// Targets that may appear on the left of an assignment or as a select
    /// `into` destination
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Variable { .. } | Expr::Indexed { .. })
    }
}

//! Statement nodes and the program root

use super::expr::{Expr, Span, TypeName};

/// Assignment operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Pow => "^=",
            AssignOp::Mod => "%=",
        }
    }
}

/// A `{ ... }` statement block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// A function parameter, optionally type-annotated
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeName,
    pub span: Span,
}

/// The external binding of `name => (params) external "module", "symbol";`
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalRef {
    pub module: String,
    pub symbol: String,
}

/// One field of a select statement; `name` is `*` for the wildcard
#[derive(Debug, Clone, PartialEq)]
pub struct SelectField {
    pub name: String,
    pub alias: Option<String>,
    pub span: Span,
}

/// A library named by an include statement
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryRef {
    pub name: String,
    pub span: Span,
}

/// An `elif` branch of an if statement
#[derive(Debug, Clone, PartialEq)]
pub struct ElifBranch {
    pub condition: Expr,
    pub block: Block,
    pub span: Span,
}

/// A `case` branch of a switch statement
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub label: Expr,
    pub block: Block,
    pub span: Span,
}

/// A statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment {
        target: Expr,
        op: AssignOp,
        value: Expr,
        /// `target []= value;` appends to an array
        append: bool,
        constant: bool,
        span: Span,
    },
    FunctionDef {
        name: String,
        params: Vec<Parameter>,
        return_type: TypeName,
        body: Option<Block>,
        external: Option<ExternalRef>,
        span: Span,
    },
    /// A bare call in statement position
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    /// A bare call through an indexed variable: `handlers[kind](args);`
    IndexedCall {
        target: Expr,
        args: Vec<Expr>,
        span: Span,
    },
    If {
        condition: Expr,
        block: Block,
        elifs: Vec<ElifBranch>,
        else_block: Option<Block>,
        span: Span,
    },
    While {
        condition: Expr,
        block: Block,
        span: Span,
    },
    Foreach {
        iterable: Expr,
        block: Block,
        span: Span,
    },
    Switch {
        subject: Expr,
        cases: Vec<CaseBranch>,
        default: Option<Block>,
        span: Span,
    },
    Select {
        fields: Vec<SelectField>,
        distinct: bool,
        from: Expr,
        where_clause: Option<Expr>,
        merge: bool,
        into: Expr,
        span: Span,
    },
    Include {
        libraries: Vec<LibraryRef>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Print {
        args: Vec<Expr>,
        span: Span,
    },
    Halt {
        value: Option<Expr>,
        span: Span,
    },
    Block(Block),
}

/// The parsed root of a script
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    /// Source file name, carried for diagnostics
    pub file: String,
}

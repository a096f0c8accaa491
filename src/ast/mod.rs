//! Abstract syntax tree for the Macal language

mod expr;
mod stmt;
mod value;

pub use expr::{BinaryOp, Expr, Span, TypeName, UnaryOp};
pub use stmt::{
    AssignOp, Block, CaseBranch, ElifBranch, ExternalRef, LibraryRef, Parameter, Program,
    SelectField, Stmt,
};
pub use value::Value;

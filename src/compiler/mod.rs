//! Instruction stream generation
//!
//! Lowers a parsed program to a flat, printable instruction stream. The
//! scope stack validates name references during lowering and handles the
//! visibility rules for functions, loops and included libraries.

mod codegen;
mod instruction;
mod scope;

pub use codegen::{compile_program, Compiler};
pub use instruction::{FieldSpec, Instruction};
pub use scope::{FrameKind, ScopeStack};

//! Recursive descent parser
//!
//! Turns the token stream into the statement and expression tree defined
//! in [`crate::ast`].

mod literal;
mod script_parser;

pub use script_parser::{parse_script, Parser};

//! Macal tokenization

mod keywords;
mod scanner;
mod token;

pub use scanner::{tokenize, Lexer};
pub use token::{Token, TokenKind};

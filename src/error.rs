//! Error types for rust-macal

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while compiling a Macal script
#[derive(Error, Debug)]
pub enum MacalError {
    #[error("Failed to read script file: {path}")]
    ScriptReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script file contains invalid characters: {path}")]
    ScriptEncodingError { path: PathBuf },

    #[error("Lex error at line {line}, column {column}: {message}")]
    LexError {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("Parse error in {file} at line {line}, column {column}: {message}")]
    ParseError {
        file: String,
        line: u32,
        column: u32,
        message: String,
    },

    #[error("Compile error in {file}: {message}")]
    CompileError { file: String, message: String },

    #[error("Library '{name}' not found (included at line {line}, column {column})")]
    LibraryNotFound {
        name: String,
        line: u32,
        column: u32,
    },

    #[error("Failed to write listing to {path}")]
    ListingWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

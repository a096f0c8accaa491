//! Literal token conversion helpers

use crate::ast::Value;
use crate::lexer::{Token, TokenKind};

/// Strip a single leading and trailing quote character, if present
pub fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix(['"', '\'']).unwrap_or(s);
    s.strip_suffix(['"', '\'']).unwrap_or(s)
}

/// Convert a literal token's lexeme into a typed `Value`.
///
/// Returns `None` for tokens that are not literal-valued; numeric parse
/// failures are reported as `Err` with a message.
pub fn token_value(token: &Token) -> Option<Result<Value, String>> {
    let value = match token.kind {
        TokenKind::Integer => match token.lexeme.parse::<i64>() {
            Ok(v) => Value::Int(v),
            Err(_) => return Some(Err(format!("Integer literal out of range: {}", token.lexeme))),
        },
        TokenKind::Float => match token.lexeme.parse::<f64>() {
            Ok(v) => Value::Float(v),
            Err(_) => return Some(Err(format!("Invalid float literal: {}", token.lexeme))),
        },
        TokenKind::String | TokenKind::InterpolationPart | TokenKind::InterpolationEnd => {
            Value::Str(strip_quotes(&token.lexeme).to_string())
        }
        TokenKind::True => Value::Bool(true),
        TokenKind::False => Value::Bool(false),
        TokenKind::Nil => Value::Nil,
        _ => return None,
    };
    Some(Ok(value))
}

//! Keyword table for the Macal language

use std::collections::HashMap;
use std::sync::LazyLock;

use super::token::TokenKind;

/// Map of reserved words to their token kinds. Identifiers are looked up here
/// after scanning; a miss means a plain identifier.
pub static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    HashMap::from([
        // statements
        ("if", TokenKind::If),
        ("elif", TokenKind::Elif),
        ("else", TokenKind::Else),
        ("while", TokenKind::While),
        ("foreach", TokenKind::Foreach),
        ("break", TokenKind::Break),
        ("continue", TokenKind::Continue),
        ("return", TokenKind::Return),
        ("select", TokenKind::Select),
        ("distinct", TokenKind::Distinct),
        ("as", TokenKind::As),
        ("from", TokenKind::From),
        ("where", TokenKind::Where),
        ("merge", TokenKind::Merge),
        ("into", TokenKind::Into),
        ("print", TokenKind::Print),
        ("halt", TokenKind::Halt),
        ("include", TokenKind::Include),
        ("switch", TokenKind::Switch),
        ("case", TokenKind::Case),
        ("default", TokenKind::Default),
        ("const", TokenKind::Const),
        ("external", TokenKind::External),
        // word-form logical operators
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("xor", TokenKind::Xor),
        ("not", TokenKind::Not),
        // literals
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("nil", TokenKind::Nil),
        // type annotations
        ("integer", TokenKind::TypeInteger),
        ("float", TokenKind::TypeFloat),
        ("string", TokenKind::TypeString),
        ("bool", TokenKind::TypeBool),
        ("array", TokenKind::TypeArray),
        ("record", TokenKind::TypeRecord),
        ("function", TokenKind::TypeFunction),
        ("params", TokenKind::TypeParams),
        ("variable", TokenKind::TypeVariable),
        // type-check builtins
        ("IsString", TokenKind::IsString),
        ("IsInt", TokenKind::IsInt),
        ("IsFloat", TokenKind::IsFloat),
        ("IsBool", TokenKind::IsBool),
        ("IsRecord", TokenKind::IsRecord),
        ("IsArray", TokenKind::IsArray),
        ("IsFunction", TokenKind::IsFunction),
        ("IsNil", TokenKind::IsNil),
        ("Type", TokenKind::TypeQuery),
    ])
});

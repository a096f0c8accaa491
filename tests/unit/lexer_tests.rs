//! Lexer tests over the public tokenize API

use pretty_assertions::assert_eq;
use rust_macal::lexer::{tokenize, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_full_statement_token_stream() {
    assert_eq!(
        kinds("answer = 6 * 7;"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::Integer,
            TokenKind::Star,
            TokenKind::Integer,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(
        kinds("if If IF"),
        vec![
            TokenKind::If,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_word_operators() {
    assert_eq!(
        kinds("a and b or c xor not d"),
        vec![
            TokenKind::Identifier,
            TokenKind::And,
            TokenKind::Identifier,
            TokenKind::Or,
            TokenKind::Identifier,
            TokenKind::Xor,
            TokenKind::Not,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_symbol_and_word_operators_agree() {
    assert_eq!(kinds("a && b"), kinds("a and b"));
    assert_eq!(kinds("a || b"), kinds("a or b"));
}

#[test]
fn test_type_keywords_and_checks() {
    assert_eq!(
        kinds("integer string IsFloat Type"),
        vec![
            TokenKind::TypeInteger,
            TokenKind::TypeString,
            TokenKind::IsFloat,
            TokenKind::TypeQuery,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_function_definition_tokens() {
    assert_eq!(
        kinds("add => (integer a, integer b) integer { return a + b; }"),
        vec![
            TokenKind::Identifier,
            TokenKind::Arrow,
            TokenKind::LeftParen,
            TokenKind::TypeInteger,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::TypeInteger,
            TokenKind::Identifier,
            TokenKind::RightParen,
            TokenKind::TypeInteger,
            TokenKind::LeftBrace,
            TokenKind::Return,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::RightBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_brackets_with_space_are_not_new_array() {
    assert_eq!(
        kinds("a[ 1 ]"),
        vec![
            TokenKind::Identifier,
            TokenKind::LeftBracket,
            TokenKind::Integer,
            TokenKind::RightBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_token_offsets_index_into_source() {
    let source = "alpha = beta;";
    let tokens = tokenize(source).unwrap();
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        let slice: String = source
            .chars()
            .skip(token.offset)
            .take(token.lexeme.chars().count())
            .collect();
        assert_eq!(slice, token.lexeme, "offset of {:?}", token.kind);
    }
}

#[test]
fn test_interpolation_with_multiple_expressions() {
    let tokens: Vec<_> = tokenize("$\"{a} and {b}\"")
        .unwrap()
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        tokens,
        vec![
            TokenKind::InterpolationStart,
            TokenKind::InterpolationPart,
            TokenKind::Identifier,
            TokenKind::InterpolationPart,
            TokenKind::Identifier,
            TokenKind::InterpolationEnd,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_lex_error_reports_position() {
    let err = tokenize("x = 1;\ny = ?;").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 2"), "{message}");
    assert!(message.contains('?'), "{message}");
}

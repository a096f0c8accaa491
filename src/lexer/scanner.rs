//! The Macal tokenizer
//!
//! Single-pass scanner over the script text. Whitespace and comments are
//! emitted as tokens rather than dropped, so that concatenating the lexemes
//! of a comment-free, escape-free script reproduces the source text.
//!
//! String interpolation (`$"… {expr} …"`) is handled with a small state
//! machine: the `$` arms interpolation, the opening quote switches the lexer
//! into string mode, `{` switches to expression mode (tokens inside are lexed
//! normally), and `}` switches back. String parts are emitted padded with the
//! terminator quote at both ends so the parser can strip quotes uniformly.

use crate::error::MacalError;

use super::keywords::KEYWORDS;
use super::token::{Token, TokenKind};

/// Lexer over a Macal script
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    /// Set after `$`; the next token must be an opening quote
    interp_armed: bool,
    /// Inside an interpolated string body
    interp_in_string: bool,
    /// Inside a `{…}` expression of an interpolated string
    interp_in_expr: bool,
    /// The quote character that terminates the interpolated string
    interp_terminator: Option<char>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            interp_armed: false,
            interp_in_string: false,
            interp_in_expr: false,
            interp_terminator: None,
        }
    }

    /// Tokenize the whole input, ending with an EOF token
    pub fn tokenize(mut self) -> Result<Vec<Token>, MacalError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, MacalError> {
        Err(MacalError::LexError {
            line: self.line,
            column: self.column,
            message: message.into(),
        })
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }

    /// Line bookkeeping; call before advancing over a possible newline
    fn track_newline(&mut self) {
        if self.current() == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn next_token(&mut self) -> Result<Token, MacalError> {
        let cur = match self.current() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, "", self.line, self.column, self.pos)),
        };
        if self.interp_armed {
            return self.interpolation_body_start();
        }
        if self.interp_in_string && !self.interp_in_expr {
            return self.interpolation_part(self.pos, self.line, self.column);
        }
        if self.interp_in_string && self.interp_in_expr && cur == '}' {
            self.interp_in_expr = false;
            self.advance();
            return self.interpolation_part(self.pos, self.line, self.column);
        }
        if cur.is_whitespace() {
            return Ok(self.whitespace_token());
        }
        if cur.is_ascii_digit() {
            return Ok(self.number_token());
        }
        if cur == '"' || cur == '\'' {
            return self.string_token();
        }
        if cur == '/' && self.peek() == Some('/') {
            return Ok(self.short_comment_token());
        }
        if cur == '#' {
            return Ok(self.short_comment_token());
        }
        if cur == '/' && self.peek() == Some('*') {
            return Ok(self.long_comment_token());
        }
        if cur.is_alphabetic() || cur == '_' {
            return Ok(self.identifier_token());
        }
        self.operator_token(cur)
    }

    fn whitespace_token(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        while self.current().is_some_and(|c| c.is_whitespace()) {
            self.track_newline();
            self.advance();
        }
        Token::new(TokenKind::Whitespace, self.slice(start, self.pos), line, column, start)
    }

    fn number_token(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        let mut kind = TokenKind::Integer;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.current() == Some('.') {
            kind = TokenKind::Float;
            self.advance();
            while self.current().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        Token::new(kind, self.slice(start, self.pos), line, column, start)
    }

    fn string_token(&mut self) -> Result<Token, MacalError> {
        let (start, line, column) = (self.pos, self.line, self.column);
        let terminator = self.current().unwrap_or('"');
        self.advance();
        while self.current().is_some_and(|c| c != terminator) {
            self.track_newline();
            self.advance();
        }
        if self.current().is_none() {
            return self.error("Unterminated string literal");
        }
        self.advance(); // closing quote
        let lexeme = rewrite_escapes(&self.slice(start, self.pos));
        Ok(Token::new(TokenKind::String, lexeme, line, column, start))
    }

    fn short_comment_token(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        while self.current().is_some_and(|c| c != '\n') {
            self.advance();
        }
        Token::new(TokenKind::Comment, self.slice(start, self.pos), line, column, start)
    }

    fn long_comment_token(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.advance(); // skip /
        self.advance(); // skip *
        while self.current().is_some() {
            self.track_newline();
            self.advance();
            if self.current() == Some('*') && self.peek() == Some('/') {
                break;
            }
        }
        self.advance(); // skip *
        self.advance(); // skip /
        let end = self.pos.min(self.chars.len());
        let text = self
            .slice(start, end)
            .replace('\r', " ")
            .replace('\n', " ")
            .replace('\t', "    ");
        Token::new(TokenKind::Comment, text, line, column, start)
    }

    fn identifier_token(&mut self) -> Token {
        let (start, line, column) = (self.pos, self.line, self.column);
        while self.current().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let identifier = self.slice(start, self.pos);
        let kind = KEYWORDS
            .get(identifier.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        Token::new(kind, identifier, line, column, start)
    }

    /// The token after the arming `$`: must be a quote, and the first string
    /// part follows immediately.
    fn interpolation_body_start(&mut self) -> Result<Token, MacalError> {
        let cur = self.current();
        if cur != Some('"') && cur != Some('\'') {
            return self.error(format!(
                "Expected ' or \" after $, got {}",
                cur.map_or_else(|| "end of input".to_string(), |c| format!("'{}'", c))
            ));
        }
        self.interp_armed = false;
        self.interp_in_string = true;
        self.interp_terminator = cur;
        let (start, line, column) = (self.pos, self.line, self.column);
        self.advance(); // skip the opening quote
        self.interpolation_part(start, line, column)
    }

    /// Scan a string part up to the next `{expr}` or the closing quote
    fn interpolation_part(&mut self, start: usize, line: u32, column: u32) -> Result<Token, MacalError> {
        let terminator = match self.interp_terminator {
            Some(t) => t,
            None => return self.error("Interpolation state lost"),
        };
        while self
            .current()
            .is_some_and(|c| c != terminator && (c != '{' || self.peek() == Some('{')))
        {
            self.track_newline();
            self.advance();
        }
        if self.current() == Some(terminator) {
            self.interp_in_string = false;
            self.advance();
            let mut value = self.slice(start, self.pos);
            if !value.starts_with(terminator) {
                value.insert(0, terminator);
            }
            return Ok(Token::new(TokenKind::InterpolationEnd, value, line, column, start));
        }
        if self.current() == Some('{') {
            self.interp_in_expr = true;
            self.advance();
            let mut value = self.slice(start, self.pos - 1); // exclude the {
            if !value.starts_with(terminator) {
                value.insert(0, terminator);
            }
            if !value.ends_with(terminator) {
                value.push(terminator);
            }
            return Ok(Token::new(TokenKind::InterpolationPart, value, line, column, start));
        }
        self.error("Unterminated interpolated string")
    }

    fn operator_token(&mut self, cur: char) -> Result<Token, MacalError> {
        let (start, line, column) = (self.pos, self.line, self.column);
        let two = |lexer: &mut Self, second: char, double: TokenKind, single: TokenKind| {
            lexer.advance();
            if lexer.current() == Some(second) {
                lexer.advance();
                let lexeme: String = [cur, second].iter().collect();
                Token::new(double, lexeme, line, column, start)
            } else {
                Token::new(single, cur.to_string(), line, column, start)
            }
        };
        let token = match cur {
            '+' => {
                self.advance();
                match self.current() {
                    Some('+') => {
                        self.advance();
                        Token::new(TokenKind::Increment, "++", line, column, start)
                    }
                    Some('=') => {
                        self.advance();
                        Token::new(TokenKind::PlusAssign, "+=", line, column, start)
                    }
                    _ => Token::new(TokenKind::Plus, "+", line, column, start),
                }
            }
            '-' => {
                self.advance();
                match self.current() {
                    Some('-') => {
                        self.advance();
                        Token::new(TokenKind::Decrement, "--", line, column, start)
                    }
                    Some('=') => {
                        self.advance();
                        Token::new(TokenKind::MinusAssign, "-=", line, column, start)
                    }
                    _ => Token::new(TokenKind::Minus, "-", line, column, start),
                }
            }
            '*' => two(self, '=', TokenKind::StarAssign, TokenKind::Star),
            '/' => two(self, '=', TokenKind::SlashAssign, TokenKind::Slash),
            '^' => two(self, '=', TokenKind::CaretAssign, TokenKind::Caret),
            '%' => two(self, '=', TokenKind::PercentAssign, TokenKind::Percent),
            '=' => {
                self.advance();
                match self.current() {
                    Some('=') => {
                        self.advance();
                        Token::new(TokenKind::Equal, "==", line, column, start)
                    }
                    Some('>') => {
                        self.advance();
                        Token::new(TokenKind::Arrow, "=>", line, column, start)
                    }
                    _ => Token::new(TokenKind::Assign, "=", line, column, start),
                }
            }
            '<' => two(self, '=', TokenKind::LessEqual, TokenKind::Less),
            '>' => two(self, '=', TokenKind::GreaterEqual, TokenKind::Greater),
            '!' => two(self, '=', TokenKind::NotEqual, TokenKind::Not),
            '&' => two(self, '&', TokenKind::And, TokenKind::BitAnd),
            '|' => two(self, '|', TokenKind::Or, TokenKind::BitOr),
            '~' => {
                self.advance();
                Token::new(TokenKind::BitNot, "~", line, column, start)
            }
            '(' => {
                self.advance();
                Token::new(TokenKind::LeftParen, "(", line, column, start)
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::RightParen, ")", line, column, start)
            }
            '[' => two(self, ']', TokenKind::NewArray, TokenKind::LeftBracket),
            ']' => {
                self.advance();
                Token::new(TokenKind::RightBracket, "]", line, column, start)
            }
            '{' => two(self, '}', TokenKind::NewRecord, TokenKind::LeftBrace),
            '}' => {
                self.advance();
                Token::new(TokenKind::RightBrace, "}", line, column, start)
            }
            ',' => {
                self.advance();
                Token::new(TokenKind::Comma, ",", line, column, start)
            }
            ':' => {
                self.advance();
                Token::new(TokenKind::Colon, ":", line, column, start)
            }
            ';' => {
                self.advance();
                Token::new(TokenKind::Semicolon, ";", line, column, start)
            }
            '.' => {
                self.advance();
                Token::new(TokenKind::Dot, ".", line, column, start)
            }
            '$' => {
                self.advance();
                self.interp_armed = true;
                Token::new(TokenKind::InterpolationStart, "$", line, column, start)
            }
            other => return self.error(format!("Invalid character '{}'", other)),
        };
        Ok(token)
    }
}

/// Rewrite the `\n`, `\t` and `\r` escape sequences into control characters
fn rewrite_escapes(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t").replace("\\r", "\r")
}

/// Tokenize a script in one call
pub fn tokenize(source: &str) -> Result<Vec<Token>, MacalError> {
    Lexer::new(source).tokenize()
}

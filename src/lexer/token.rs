//! Token types produced by the Macal lexer

use std::fmt;

/// The kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Integer,
    Float,
    String,
    True,
    False,
    Nil,

    Identifier,

    // Statement keywords
    If,
    Elif,
    Else,
    While,
    Foreach,
    Break,
    Continue,
    Return,
    Select,
    Distinct,
    As,
    From,
    Where,
    Merge,
    Into,
    Print,
    Halt,
    Include,
    Switch,
    Case,
    Default,
    Const,
    External,

    // Type keywords (parameter and return type annotations)
    TypeInteger,
    TypeFloat,
    TypeString,
    TypeBool,
    TypeArray,
    TypeRecord,
    TypeFunction,
    TypeParams,
    TypeVariable,

    // Type-check builtins
    IsString,
    IsInt,
    IsFloat,
    IsBool,
    IsRecord,
    IsArray,
    IsFunction,
    IsNil,
    /// The `Type(x)` query builtin
    TypeQuery,

    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,

    // Compound assignment operators
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    CaretAssign,
    PercentAssign,
    Increment,
    Decrement,

    Assign,
    /// `=>` introducing a function definition
    Arrow,

    // Comparison operators
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical operators (symbol and word forms lex to the same kind)
    And,
    Or,
    Xor,
    Not,

    // Bitwise operators
    BitAnd,
    BitOr,
    BitNot,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,

    /// `[]` — empty array literal / append marker
    NewArray,
    /// `{}` — empty record literal
    NewRecord,

    // String interpolation
    InterpolationStart,
    InterpolationPart,
    InterpolationEnd,

    // Trivia
    Whitespace,
    Comment,

    Eof,
}

impl TokenKind {
    /// Whitespace and comments are kept in the token stream for round-trip
    /// fidelity but are stripped before parsing.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Operators accepted on the right of an assignment target
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
                | TokenKind::CaretAssign
                | TokenKind::PercentAssign
                | TokenKind::Arrow
        )
    }

    /// Type annotation keywords usable in parameter lists and return types
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::TypeInteger
                | TokenKind::TypeFloat
                | TokenKind::TypeString
                | TokenKind::TypeBool
                | TokenKind::TypeArray
                | TokenKind::TypeRecord
                | TokenKind::TypeFunction
                | TokenKind::TypeParams
                | TokenKind::TypeVariable
        )
    }

    /// `IsString(x)`, `IsInt(x)`, ... builtins
    pub fn is_type_check(self) -> bool {
        matches!(
            self,
            TokenKind::IsString
                | TokenKind::IsInt
                | TokenKind::IsFloat
                | TokenKind::IsBool
                | TokenKind::IsRecord
                | TokenKind::IsArray
                | TokenKind::IsFunction
                | TokenKind::IsNil
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexed token with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The raw text of the token. String escape sequences are already
    /// rewritten; interpolation parts are padded with the terminator quote.
    pub lexeme: String,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
    /// Character offset of the token start in the source
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32, offset: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {:?}",
            self.line, self.column, self.kind, self.lexeme
        )
    }
}

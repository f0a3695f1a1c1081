mod span;

use compact_str::CompactString;
pub use span::{SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("and", TokenKind::KeywordAnd);
    map.insert("or", TokenKind::KeywordOr);
    map.insert("print", TokenKind::KeywordPrint);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("true", TokenKind::KeywordTrue);
    map.insert("false", TokenKind::KeywordFalse);
    map.insert("nil", TokenKind::KeywordNil);
    map.insert("for", TokenKind::KeywordFor);
    map.insert("while", TokenKind::KeywordWhile);
    map.insert("fun", TokenKind::KeywordFun);
    map.insert("return", TokenKind::KeywordReturn);
    map.insert("class", TokenKind::KeywordClass);
    map.insert("super", TokenKind::KeywordSuper);
    map.insert("this", TokenKind::KeywordThis);
    map.insert("var", TokenKind::KeywordVar);
    map
});

/// Looks up a reserved word. Returns `None` for ordinary identifiers.
pub fn keyword_lookup(text: &str) -> Option<TokenKind> {
    KEYWORD_HASHMAP.get(text).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn range(&self) -> Range<usize> {
        self.start.into()..(self.start + self.length).into()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }
}

/// A source position: byte span plus the 1-based line and column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Miscellaneous
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,
    QuestionMark,
    Colon,
    // Operators
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,

    // Literals
    Ident,
    StringLiteral,
    NumericLiteral,

    // Keywords
    KeywordAnd,
    KeywordOr,
    KeywordPrint,
    KeywordIf,
    KeywordElse,
    KeywordTrue,
    KeywordFalse,
    KeywordNil,
    KeywordFor,
    KeywordWhile,
    KeywordFun,
    KeywordReturn,
    KeywordClass,
    KeywordSuper,
    KeywordThis,
    KeywordVar,

    // End of file.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::LeftParenthesis => "LEFT_PAREN",
            TokenKind::RightParenthesis => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Minus => "MINUS",
            TokenKind::Plus => "PLUS",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Slash => "SLASH",
            TokenKind::Star => "STAR",
            TokenKind::QuestionMark => "QMARK",
            TokenKind::Colon => "COLON",
            TokenKind::Bang => "BANG",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::GreaterThan => "GREATER",
            TokenKind::GreaterThanEqual => "GREATER_EQUAL",
            TokenKind::LessThan => "LESS",
            TokenKind::LessThanEqual => "LESS_EQUAL",
            TokenKind::Ident => "IDENTIFIER",
            TokenKind::StringLiteral => "STRING",
            TokenKind::NumericLiteral => "NUMBER",
            TokenKind::KeywordAnd => "AND",
            TokenKind::KeywordOr => "OR",
            TokenKind::KeywordPrint => "PRINT",
            TokenKind::KeywordIf => "IF",
            TokenKind::KeywordElse => "ELSE",
            TokenKind::KeywordTrue => "TRUE",
            TokenKind::KeywordFalse => "FALSE",
            TokenKind::KeywordNil => "NIL",
            TokenKind::KeywordFor => "FOR",
            TokenKind::KeywordWhile => "WHILE",
            TokenKind::KeywordFun => "FUN",
            TokenKind::KeywordReturn => "RETURN",
            TokenKind::KeywordClass => "CLASS",
            TokenKind::KeywordSuper => "SUPER",
            TokenKind::KeywordThis => "THIS",
            TokenKind::KeywordVar => "VAR",
            TokenKind::Eof => "ENDFILE",
        };
        write!(f, "{name}")
    }
}

/// Payload carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(CompactString),
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(v) => write!(f, "{v:?}"),
            Literal::String(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    /// Only present for `NUMBER` and `STRING` tokens.
    pub literal: Option<Literal>,
}

impl Token {
    pub fn location(&self) -> Location {
        Location {
            span: self.span,
            line: self.line,
            column: self.column,
        }
    }

    pub fn lexeme<'src>(&self, source: &'src str) -> Option<&'src str> {
        source.get(self.span.range())
    }
}

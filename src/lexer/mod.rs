mod cursor;
mod error;
pub mod formatter;
mod token;

use cursor::Cursor;
pub use error::{LexicalError, LexicalErrorKind};
pub use token::{
    keyword_lookup, Literal, Location, Span, SpanIndex, SpanLength, Token, TokenKind,
    KEYWORD_HASHMAP,
};

/// Result of scanning a whole buffer. Scanning never stops at an error, so
/// `tokens` always ends with an `Eof` token even when `errors` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Scanned {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>,
}

impl Scanned {
    pub fn into_result(self) -> Result<Vec<Token>, Vec<LexicalError>> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

/// Scans `source` into its token sequence, or every lexical error found.
pub fn scan(source: &str) -> Result<Vec<Token>, Vec<LexicalError>> {
    Lexer::new(source).scan_all().into_result()
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    /// Drains the lexer, collecting tokens and errors separately.
    pub fn scan_all(mut self) -> Scanned {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let is_eof = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if is_eof {
                        break;
                    }
                }
                Err(error) => {
                    tracing::trace!(%error, "lexical error");
                    errors.push(error);
                }
            }
        }
        tracing::debug!(
            tokens = tokens.len(),
            errors = errors.len(),
            "scanned source"
        );
        Scanned { tokens, errors }
    }

    /// Produces the next token. Once the input is exhausted every call
    /// returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            self.cursor.mark();
            let Some(c) = self.cursor.advance() else {
                return Ok(self.make_token(TokenKind::Eof, None));
            };

            let kind = match c {
                // Single character tokens
                '(' => TokenKind::LeftParenthesis,
                ')' => TokenKind::RightParenthesis,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '-' => TokenKind::Minus,
                '+' => TokenKind::Plus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                '?' => TokenKind::QuestionMark,
                ':' => TokenKind::Colon,
                // One or two character tokens
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => self.either('=', TokenKind::LessThanEqual, TokenKind::LessThan),
                '>' => self.either('=', TokenKind::GreaterThanEqual, TokenKind::GreaterThan),
                '/' => {
                    if self.cursor.eat('/') {
                        self.cursor.eat_while(|c| c != '\n');
                        continue;
                    } else if self.cursor.eat('*') {
                        self.skip_block_comment();
                        continue;
                    } else {
                        TokenKind::Slash
                    }
                }
                ' ' | '\r' | '\t' | '\n' => continue,
                '"' => return self.lex_string(),
                c if c.is_ascii_digit() => return Ok(self.lex_number()),
                c if c.is_ascii_alphabetic() => return Ok(self.lex_ident_or_keyword()),
                c => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::Unrecognized(c),
                        location: self.cursor.location(),
                    })
                }
            };
            return Ok(self.make_token(kind, None));
        }
    }
}

impl<'src> Lexer<'src> {
    fn make_token(&self, kind: TokenKind, literal: Option<Literal>) -> Token {
        let location = self.cursor.location();
        Token {
            kind,
            span: location.span,
            line: location.line,
            column: location.column,
            literal,
        }
    }

    fn either(&mut self, next: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.cursor.eat(next) {
            matched
        } else {
            otherwise
        }
    }

    // Consumes through the closing `*/`; an unclosed comment runs to the end of input.
    fn skip_block_comment(&mut self) {
        while let Some(c) = self.cursor.advance() {
            if c == '*' && self.cursor.eat('/') {
                return;
            }
        }
    }

    fn lex_string(&mut self) -> Result<Token, LexicalError> {
        self.cursor.eat_while(|c| c != '"');
        if self.cursor.is_at_end() {
            return Err(LexicalError {
                kind: LexicalErrorKind::UnclosedString,
                location: self.cursor.location(),
            });
        }
        // Closing quote
        self.cursor.advance();
        let lexeme = self.cursor.lexeme();
        let value = &lexeme[1..lexeme.len() - 1];
        Ok(self.make_token(
            TokenKind::StringLiteral,
            Some(Literal::String(value.into())),
        ))
    }

    fn lex_number(&mut self) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        let value: f64 = self
            .cursor
            .lexeme()
            .parse()
            .expect("Digits with at most one interior dot always parse into f64.");
        self.make_token(TokenKind::NumericLiteral, Some(Literal::Number(value)))
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_alphanumeric());
        let kind = keyword_lookup(self.cursor.lexeme()).unwrap_or(TokenKind::Ident);
        self.make_token(kind, None)
    }
}

use super::token::{Location, Span, SpanIndex};

/// Scanner position over an immutable source buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    /// Byte offset of the first character of the lexeme being scanned.
    start: usize,
    /// Byte offset of the next unconsumed character.
    current: usize,
    line: u32,
    /// 1-based char column of the next unconsumed character.
    column: u32,
    /// Line and column captured when the lexeme was marked.
    start_line: u32,
    start_column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    pub fn mark(&mut self) {
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    pub fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.current..].chars();
        chars.next()?;
        chars.next()
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consumes the next character only if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    pub fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    /// Location of the lexeme marked last.
    pub fn location(&self) -> Location {
        let start = SpanIndex::from(self.start);
        Location {
            span: Span {
                start,
                length: SpanIndex::from(self.current) - start,
            },
            line: self.start_line,
            column: self.start_column,
        }
    }
}

use super::token::{Literal, Token, TokenKind};
use crate::lexer::{Lexer, LexicalError};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

/// `KIND lexeme literal` per token, `null` standing in for a missing literal.
pub struct BasicFormatter<'src> {
    text: &'src str,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text }
    }
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter::new(self.get_source())
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let lexeme = match token.kind {
            TokenKind::Eof => "",
            _ => token.lexeme(self.text).unwrap_or_default(),
        };
        match token.literal {
            Some(Literal::Number(v)) => format!("{} {lexeme} {v:?}", token.kind),
            Some(Literal::String(ref v)) => format!("{} {lexeme} {v}", token.kind),
            None => format!("{} {lexeme} null", token.kind),
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error}")
    }
}

pub struct DebugFormatter;

impl<'src> ToFormatter<DebugFormatter> for Lexer<'src> {
    fn create_formatter(&self) -> DebugFormatter {
        DebugFormatter {}
    }
}

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

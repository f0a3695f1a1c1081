use crate::lexer::{Location, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected an expression but got {0}.")]
    NonExpression(TokenKind),
    #[error("Expected a variable name but got {0}.")]
    NonIdentifier(TokenKind),
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Parse Error [line {location}]: {kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub location: Location,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonExpression(_) => "PA002",
            ParserErrorKind::NonIdentifier(_) => "PA003",
            ParserErrorKind::InvalidAssignmentTarget => "PA004",
        }
    }
}

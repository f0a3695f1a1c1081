use crate::lexer::Location;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Type mismatch, binary '{operator}' operator is not defined for {lhs} and {rhs}")]
    TypeMismatch {
        operator: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("Expected type '{expected}', but got '{actual}'")]
    UnexpectedOperandType {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Division by zero error")]
    DivisionByZero,
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Runtime Error [line {location}]: {kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub location: Location,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::TypeMismatch { .. } => "RT001",
            RuntimeErrorKind::UnexpectedOperandType { .. } => "RT002",
            RuntimeErrorKind::DivisionByZero => "RT003",
            RuntimeErrorKind::UndefinedVariable(_) => "RT004",
        }
    }
}

use compact_str::CompactString;

use super::{BinaryOperator, LogicalOperator, UnaryOperator};
use crate::lexer::Location;

/// A name as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: CompactString,
    pub location: Location,
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(CompactString),
    Bool(bool),
    Nil,
}

/// Expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(LiteralValue),
    Grouping(Box<Expression>),
    Variable(Ident),
    Assign {
        name: Ident,
        value: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        location: Location,
        rhs: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        location: Location,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Logical {
        operator: LogicalOperator,
        location: Location,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        success: Box<Expression>,
        failure: Box<Expression>,
    },
}

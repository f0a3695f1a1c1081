mod operator;
mod tree;

pub use operator::{BinaryOperator, LogicalOperator, UnaryOperator};
pub use tree::{Expression, Ident, LiteralValue};

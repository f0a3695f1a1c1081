use super::{
    expression::{Expression, LiteralValue},
    statement::Statement,
    ParserError,
};
use crate::stack::ensure_sufficient_stack;

/// Interface for rendering syntax trees.
pub trait ExpressionFormatter {
    fn format(&self, tree: &Expression) -> String;
    fn format_statement(&self, statement: &Statement) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugExpressionFormatter;

impl ExpressionFormatter for DebugExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        format!("{tree:?}")
    }

    fn format_statement(&self, statement: &Statement) -> String {
        format!("{statement:?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// Fully parenthesised prefix notation, e.g. `(+ 1.0 (* 2.0 3.0))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_literal(literal: &LiteralValue) -> String {
        match literal {
            LiteralValue::Number(v) => format!("{v:?}"),
            LiteralValue::String(v) => format!("{v}"),
            LiteralValue::Bool(v) => format!("{v}"),
            LiteralValue::Nil => "nil".into(),
        }
    }

    fn format_node(tree: &Expression) -> String {
        ensure_sufficient_stack(|| match tree {
            Expression::Literal(literal) => Self::format_literal(literal),
            Expression::Grouping(inner) => format!("(group {})", Self::format_node(inner)),
            Expression::Variable(name) => format!("{name}"),
            Expression::Assign { name, value } => {
                format!("(= {name} {})", Self::format_node(value))
            }
            Expression::Unary { operator, rhs, .. } => {
                format!("({} {})", operator.symbol(), Self::format_node(rhs))
            }
            Expression::Binary {
                operator, lhs, rhs, ..
            } => format!(
                "({} {} {})",
                operator.symbol(),
                Self::format_node(lhs),
                Self::format_node(rhs)
            ),
            Expression::Logical {
                operator, lhs, rhs, ..
            } => format!(
                "({} {} {})",
                operator.symbol(),
                Self::format_node(lhs),
                Self::format_node(rhs)
            ),
            Expression::Ternary {
                condition,
                success,
                failure,
            } => format!(
                "(?: {} {} {})",
                Self::format_node(condition),
                Self::format_node(success),
                Self::format_node(failure)
            ),
        })
    }

    fn format_statement_node(statement: &Statement) -> String {
        ensure_sufficient_stack(|| match statement {
            Statement::Expression(expr) => format!("(expr {})", Self::format_node(expr)),
            Statement::Print(expr) => format!("(print {})", Self::format_node(expr)),
            Statement::VariableDecl { name, initial } => match initial {
                Some(initial) => format!("(var {name} {})", Self::format_node(initial)),
                None => format!("(var {name})"),
            },
            Statement::Block(statements) => {
                let mut buffer = String::from("(block");
                for statement in statements {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_statement_node(statement));
                }
                buffer.push(')');
                buffer
            }
            Statement::If {
                condition,
                success,
                failure,
            } => match failure {
                Some(failure) => format!(
                    "(if {} {} {})",
                    Self::format_node(condition),
                    Self::format_statement_node(success),
                    Self::format_statement_node(failure)
                ),
                None => format!(
                    "(if {} {})",
                    Self::format_node(condition),
                    Self::format_statement_node(success)
                ),
            },
            Statement::While { condition, body } => format!(
                "(while {} {})",
                Self::format_node(condition),
                Self::format_statement_node(body)
            ),
        })
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        Self::format_node(tree)
    }

    fn format_statement(&self, statement: &Statement) -> String {
        Self::format_statement_node(statement)
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error}")
    }
}

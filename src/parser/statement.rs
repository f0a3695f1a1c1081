use super::expression::{Expression, Ident};

/// Statement tree. `for` loops have no node of their own: the parser lowers
/// them into a `Block` holding the initializer and a `While`.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Print(Expression),
    VariableDecl {
        name: Ident,
        initial: Option<Expression>,
    },
    Block(Vec<Statement>),
    If {
        condition: Expression,
        success: Box<Statement>,
        failure: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
}

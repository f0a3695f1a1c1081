use super::environment::Environment;
use super::error::{RuntimeError, RuntimeErrorKind};
use super::value::Value;
use super::SystemContext;
use crate::lexer::Location;
use crate::parser::{
    expression::{BinaryOperator, Expression, Ident, LogicalOperator, UnaryOperator},
    statement::Statement,
};
use crate::stack::ensure_sufficient_stack;

/// Walks statement trees directly. The global environment lives as long as
/// the interpreter, so successive calls to [`TreeWalkInterpreter::execute`]
/// share bindings.
#[derive(Debug, Default)]
pub struct TreeWalkInterpreter {
    environment: Environment,
}

impl TreeWalkInterpreter {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }

    pub fn get_environment(&self) -> &Environment {
        &self.environment
    }

    /// Executes every statement in order. Runtime errors are reported to the
    /// context as they occur and never stop execution; they are also
    /// returned so the caller can decide on an exit status.
    pub fn execute<C: SystemContext>(
        &mut self,
        statements: &[Statement],
        source: &str,
        context: &mut C,
    ) -> Vec<RuntimeError> {
        let mut execution = Execution {
            environment: &mut self.environment,
            context,
            source,
            errors: Vec::new(),
        };
        for statement in statements {
            execution.execute_statement(statement);
        }
        tracing::debug!(
            statements = statements.len(),
            errors = execution.errors.len(),
            "executed statements"
        );
        execution.errors
    }

    /// Evaluates a lone expression against the global environment.
    pub fn evaluate<C: SystemContext>(
        &mut self,
        expr: &Expression,
        source: &str,
        context: &mut C,
    ) -> (Value, Vec<RuntimeError>) {
        let mut execution = Execution {
            environment: &mut self.environment,
            context,
            source,
            errors: Vec::new(),
        };
        let value = execution.evaluate(expr);
        (value, execution.errors)
    }
}

/// State for a single call into the interpreter.
struct Execution<'a, C> {
    environment: &'a mut Environment,
    context: &'a mut C,
    source: &'a str,
    errors: Vec<RuntimeError>,
}

impl<'a, C: SystemContext> Execution<'a, C> {
    /// Reports a failed evaluation step and substitutes nil for its value.
    fn recover(&mut self, result: Result<Value, RuntimeError>) -> Value {
        match result {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(code = error.code(), "runtime error");
                self.context.report(&error, self.source);
                self.errors.push(error);
                Value::Nil
            }
        }
    }

    fn locate(location: Location) -> impl FnOnce(RuntimeErrorKind) -> RuntimeError {
        move |kind| RuntimeError { kind, location }
    }
}

// Statements
impl<'a, C: SystemContext> Execution<'a, C> {
    fn execute_statement(&mut self, statement: &Statement) {
        ensure_sufficient_stack(|| {
            match statement {
                Statement::Expression(expr) => {
                    self.evaluate(expr);
                }
                Statement::Print(expr) => {
                    let value = self.evaluate(expr);
                    self.context.writeln(&value.to_string());
                }
                Statement::VariableDecl { name, initial } => {
                    let value = match initial {
                        Some(expr) => self.evaluate(expr),
                        None => Value::Nil,
                    };
                    self.environment.declare(&name.name, value);
                }
                Statement::Block(statements) => self.execute_block(statements),
                Statement::If {
                    condition,
                    success,
                    failure,
                } => {
                    if self.evaluate(condition).is_truthy() {
                        self.execute_statement(success);
                    } else if let Some(failure) = failure {
                        self.execute_statement(failure);
                    }
                }
                Statement::While { condition, body } => {
                    while self.evaluate(condition).is_truthy() {
                        self.execute_statement(body);
                    }
                }
            }
        })
    }

    fn execute_block(&mut self, statements: &[Statement]) {
        self.environment.enter_scope();
        for statement in statements {
            self.execute_statement(statement);
        }
        self.environment.exit_scope();
    }
}

// Expressions
impl<'a, C: SystemContext> Execution<'a, C> {
    fn evaluate(&mut self, expr: &Expression) -> Value {
        ensure_sufficient_stack(|| {
            match expr {
                Expression::Literal(literal) => Value::from(literal),
                Expression::Grouping(inner) => self.evaluate(inner),
                Expression::Variable(name) => {
                    let result = self.read_variable(name);
                    self.recover(result)
                }
                Expression::Assign { name, value } => {
                    let value = self.evaluate(value);
                    let result = self.write_variable(name, value);
                    self.recover(result)
                }
                Expression::Unary {
                    operator,
                    location,
                    rhs,
                } => {
                    let rhs = self.evaluate(rhs);
                    let result = match operator {
                        UnaryOperator::Bang => Ok(rhs.logical_not()),
                        UnaryOperator::Minus => rhs.numeric_negate(),
                    };
                    self.recover(result.map_err(Self::locate(*location)))
                }
                Expression::Binary {
                    operator,
                    location,
                    lhs,
                    rhs,
                } => {
                    let lhs = self.evaluate(lhs);
                    let rhs = self.evaluate(rhs);
                    let result = Self::apply_binary(*operator, &lhs, &rhs);
                    self.recover(result.map_err(Self::locate(*location)))
                }
                Expression::Logical {
                    operator,
                    lhs,
                    rhs,
                    ..
                } => {
                    let lhs = self.evaluate(lhs);
                    match (operator, lhs.is_truthy()) {
                        (LogicalOperator::And, false) => Value::Bool(false),
                        (LogicalOperator::Or, true) => Value::Bool(true),
                        _ => self.evaluate(rhs),
                    }
                }
                Expression::Ternary {
                    condition,
                    success,
                    failure,
                } => {
                    if self.evaluate(condition).is_truthy() {
                        self.evaluate(success)
                    } else {
                        self.evaluate(failure)
                    }
                }
            }
        })
    }

    fn apply_binary(
        operator: BinaryOperator,
        lhs: &Value,
        rhs: &Value,
    ) -> Result<Value, RuntimeErrorKind> {
        match operator {
            BinaryOperator::Add => lhs.add(rhs),
            BinaryOperator::Subtract => lhs.subtract(rhs),
            BinaryOperator::Multiply => lhs.multiply(rhs),
            BinaryOperator::Divide => lhs.divide(rhs),
            BinaryOperator::LessThan => lhs.less_than(rhs),
            BinaryOperator::LessThanEqual => lhs.less_than_or_equal(rhs),
            BinaryOperator::GreaterThan => lhs.greater_than(rhs),
            BinaryOperator::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            BinaryOperator::EqualEqual => Ok(Value::Bool(lhs.is_equal(rhs))),
            BinaryOperator::BangEqual => Ok(Value::Bool(lhs.is_not_equal(rhs))),
        }
    }

    fn read_variable(&self, name: &Ident) -> Result<Value, RuntimeError> {
        self.environment
            .access(&name.name)
            .cloned()
            .ok_or_else(|| RuntimeError {
                kind: RuntimeErrorKind::UndefinedVariable(name.name.clone()),
                location: name.location,
            })
    }

    /// The assigned value is also the value of the assignment expression.
    fn write_variable(&mut self, name: &Ident, value: Value) -> Result<Value, RuntimeError> {
        match self.environment.assign(&name.name, value.clone()) {
            Some(()) => Ok(value),
            None => Err(RuntimeError {
                kind: RuntimeErrorKind::UndefinedVariable(name.name.clone()),
                location: name.location,
            }),
        }
    }
}

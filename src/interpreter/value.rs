use super::error::RuntimeErrorKind;
use crate::parser::expression::{BinaryOperator, LiteralValue};
use compact_str::{CompactString, CompactStringExt};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Number(f64),
    String(CompactString),
    Bool(bool),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Number(v) if v.is_nan() => {
                write!(f, "{}", if v.is_sign_negative() { "-nan" } else { "nan" })
            }
            Self::Number(v) => write!(f, "{v:.6}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Number(v) => Value::Number(*v),
            LiteralValue::String(v) => Value::String(v.clone()),
            LiteralValue::Bool(v) => Value::Bool(*v),
            LiteralValue::Nil => Value::Nil,
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
        }
    }

    /// The numeric view used by `==`. Booleans read as 1 or 0; strings and
    /// nil have no numeric value and never compare equal through it.
    fn numeric_representation(&self) -> f64 {
        match self {
            Self::Number(v) => *v,
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::String(_) | Self::Nil => f64::NAN,
        }
    }

    fn type_mismatch(&self, operator: BinaryOperator, other: &Value) -> RuntimeErrorKind {
        RuntimeErrorKind::TypeMismatch {
            operator: operator.description(),
            lhs: self.type_name(),
            rhs: other.type_name(),
        }
    }

    fn numeric_operands(
        &self,
        operator: BinaryOperator,
        other: &Value,
    ) -> Result<(f64, f64), RuntimeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok((*lhs, *rhs)),
            (lhs, rhs) => Err(lhs.type_mismatch(operator, rhs)),
        }
    }
}

// Unary operators
impl Value {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false) | Value::Nil)
    }

    pub fn logical_not(&self) -> Value {
        Value::Bool(!self.is_truthy())
    }

    pub fn numeric_negate(&self) -> Result<Value, RuntimeErrorKind> {
        match self {
            Value::Number(v) => Ok(Value::Number(-v)),
            v => Err(RuntimeErrorKind::UnexpectedOperandType {
                expected: "number",
                actual: v.type_name(),
            }),
        }
    }
}

// Binary operators
impl Value {
    /// Numeric addition or string concatenation.
    pub fn add(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs + rhs)),
            (Value::String(lhs), Value::String(rhs)) => {
                Ok(Value::String([lhs, rhs].concat_compact()))
            }
            (lhs, rhs) => Err(lhs.type_mismatch(BinaryOperator::Add, rhs)),
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::Subtract, other)?;
        Ok(Value::Number(lhs - rhs))
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::Multiply, other)?;
        Ok(Value::Number(lhs * rhs))
    }

    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::Divide, other)?;
        if rhs == 0.0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        Ok(Value::Number(lhs / rhs))
    }

    pub fn less_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::LessThan, other)?;
        Ok(Value::Bool(lhs < rhs))
    }

    pub fn less_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::LessThanEqual, other)?;
        Ok(Value::Bool(lhs <= rhs))
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::GreaterThan, other)?;
        Ok(Value::Bool(lhs > rhs))
    }

    pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(BinaryOperator::GreaterThanEqual, other)?;
        Ok(Value::Bool(lhs >= rhs))
    }

    /// Nil equals only nil. Everything else compares by numeric representation.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Nil, _) | (_, Value::Nil) => false,
            (lhs, rhs) => lhs.numeric_representation() == rhs.numeric_representation(),
        }
    }

    pub fn is_not_equal(&self, other: &Value) -> bool {
        !self.is_equal(other)
    }
}


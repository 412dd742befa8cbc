//! Operator typing and constant evaluation for primitive operands.

use std::fmt::Display;

use jlitec_reflection::Value;
use serde::{Deserialize, Serialize};

use crate::r#type::Primitive;

/// An operator taking two operands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[allow(missing_docs)]
pub enum BinaryOperator {
    #[display(fmt = "+")]
    Add,
    #[display(fmt = "-")]
    Subtract,
    #[display(fmt = "*")]
    Multiply,
    #[display(fmt = "/")]
    Divide,
    #[display(fmt = "%")]
    Remainder,
    #[display(fmt = "==")]
    Equal,
    #[display(fmt = "!=")]
    NotEqual,
    #[display(fmt = "<")]
    Less,
    #[display(fmt = "<=")]
    LessEqual,
    #[display(fmt = ">")]
    Greater,
    #[display(fmt = ">=")]
    GreaterEqual,
    #[display(fmt = "&&")]
    LogicalAnd,
    #[display(fmt = "||")]
    LogicalOr,
    #[display(fmt = "&")]
    BitwiseAnd,
    #[display(fmt = "|")]
    BitwiseOr,
    #[display(fmt = "^")]
    BitwiseXor,
    #[display(fmt = "<<")]
    ShiftLeft,
    #[display(fmt = ">>")]
    ShiftRight,
    #[display(fmt = ">>>")]
    UnsignedShiftRight,
}

/// An operator taking a single operand.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[allow(missing_docs)]
pub enum UnaryOperator {
    #[display(fmt = "-")]
    Negate,
    #[display(fmt = "+")]
    Plus,
    #[display(fmt = "!")]
    LogicalNot,
    #[display(fmt = "~")]
    BitwiseNot,
}

/// Failure of a primitive arithmetic operation at evaluation time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, displaydoc::Display, thiserror::Error,
)]
pub enum ArithmeticError {
    /// / by zero
    DivisionByZero,
}

/// Failure of operator typing or evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperatorError {
    /// The operand kinds don't support the operator.
    #[error("operator `{operator}` is not supported for {operand}")]
    Unsupported {
        /// The rendered operator.
        operator: String,

        /// Description of the offending operand.
        operand: String,
    },

    /// The operation is well-typed but faulted.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

impl OperatorError {
    pub(crate) fn unsupported(
        operator: impl Display,
        operand: impl Display,
    ) -> Self {
        Self::Unsupported {
            operator: operator.to_string(),
            operand: operand.to_string(),
        }
    }
}

impl Primitive {
    /// Unary numeric promotion: `char` becomes `int`.
    const fn promoted(self) -> Self {
        match self {
            Self::Char => Self::Int,
            other => other,
        }
    }

    /// Binary numeric promotion of two numeric operands.
    fn promoted_with(self, other: Self) -> Self {
        self.promoted().max(other.promoted())
    }

    /// The result type of `self OPERATOR rhs`, or [`None`] if the operator
    /// doesn't apply to the operands.
    #[must_use]
    pub fn binary_result_type(
        self,
        operator: BinaryOperator,
        rhs: Self,
    ) -> Option<Self> {
        let numeric = self.is_numeric() && rhs.is_numeric();
        let integral = self.is_integral() && rhs.is_integral();
        let boolean = self == Self::Boolean && rhs == Self::Boolean;

        match operator {
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Remainder => {
                numeric.then(|| self.promoted_with(rhs))
            }

            BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual => numeric.then_some(Self::Boolean),

            BinaryOperator::Equal | BinaryOperator::NotEqual => {
                (numeric || boolean).then_some(Self::Boolean)
            }

            BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => {
                boolean.then_some(Self::Boolean)
            }

            BinaryOperator::BitwiseAnd
            | BinaryOperator::BitwiseOr
            | BinaryOperator::BitwiseXor => {
                if boolean {
                    Some(Self::Boolean)
                } else {
                    integral.then(|| self.promoted_with(rhs))
                }
            }

            BinaryOperator::ShiftLeft
            | BinaryOperator::ShiftRight
            | BinaryOperator::UnsignedShiftRight => {
                integral.then(|| self.promoted())
            }
        }
    }

    /// The result type of `OPERATOR self`, or [`None`] if the operator
    /// doesn't apply.
    #[must_use]
    pub fn unary_result_type(self, operator: UnaryOperator) -> Option<Self> {
        match operator {
            UnaryOperator::Negate | UnaryOperator::Plus => {
                self.is_numeric().then(|| self.promoted())
            }
            UnaryOperator::LogicalNot => {
                (self == Self::Boolean).then_some(Self::Boolean)
            }
            UnaryOperator::BitwiseNot => {
                self.is_integral().then(|| self.promoted())
            }
        }
    }
}

/// A numeric operand after promotion.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Numeric {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Numeric {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(value) => Some(Self::Int(*value)),
            Value::Long(value) => Some(Self::Long(*value)),
            Value::Float(value) => Some(Self::Float(*value)),
            Value::Double(value) => Some(Self::Double(*value)),
            Value::Char(value) => {
                Some(Self::Int(i32::try_from(u32::from(*value)).unwrap_or(0)))
            }
            _ => None,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_lossless
    )]
    fn convert(self, target: Primitive) -> Self {
        match (self, target) {
            (Self::Int(value), Primitive::Long) => Self::Long(i64::from(value)),
            (Self::Int(value), Primitive::Float) => Self::Float(value as f32),
            (Self::Int(value), Primitive::Double) => {
                Self::Double(f64::from(value))
            }
            (Self::Long(value), Primitive::Float) => Self::Float(value as f32),
            (Self::Long(value), Primitive::Double) => Self::Double(value as f64),
            (Self::Float(value), Primitive::Double) => {
                Self::Double(f64::from(value))
            }
            (numeric, _) => numeric,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Int(value) => Value::Int(value),
            Self::Long(value) => Value::Long(value),
            Self::Float(value) => Value::Float(value),
            Self::Double(value) => Value::Double(value),
        }
    }

    /// The shift distance masked to the width of the shifted operand.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn shift_distance(self, mask: u32) -> u32 {
        let distance = match self {
            Self::Int(value) => i64::from(value),
            Self::Long(value) => value,
            Self::Float(_) | Self::Double(_) => 0,
        };

        (distance as u32) & mask
    }
}

fn primitive_of(value: &Value) -> Option<Primitive> {
    match value {
        Value::Int(_) => Some(Primitive::Int),
        Value::Long(_) => Some(Primitive::Long),
        Value::Float(_) => Some(Primitive::Float),
        Value::Double(_) => Some(Primitive::Double),
        Value::Boolean(_) => Some(Primitive::Boolean),
        Value::Char(_) => Some(Primitive::Char),
        Value::Null | Value::String(_) | Value::Object(_) => None,
    }
}

fn arithmetic(
    operator: BinaryOperator,
    lhs: Numeric,
    rhs: Numeric,
) -> Result<Numeric, ArithmeticError> {
    use BinaryOperator::{Add, Divide, Multiply, Remainder, Subtract};

    Ok(match (lhs, rhs) {
        (Numeric::Int(lhs), Numeric::Int(rhs)) => Numeric::Int(match operator {
            Add => lhs.wrapping_add(rhs),
            Subtract => lhs.wrapping_sub(rhs),
            Multiply => lhs.wrapping_mul(rhs),
            Divide | Remainder if rhs == 0 => {
                return Err(ArithmeticError::DivisionByZero)
            }
            Divide => lhs.wrapping_div(rhs),
            _ => lhs.wrapping_rem(rhs),
        }),

        (Numeric::Long(lhs), Numeric::Long(rhs)) => {
            Numeric::Long(match operator {
                Add => lhs.wrapping_add(rhs),
                Subtract => lhs.wrapping_sub(rhs),
                Multiply => lhs.wrapping_mul(rhs),
                Divide | Remainder if rhs == 0 => {
                    return Err(ArithmeticError::DivisionByZero)
                }
                Divide => lhs.wrapping_div(rhs),
                _ => lhs.wrapping_rem(rhs),
            })
        }

        (Numeric::Float(lhs), Numeric::Float(rhs)) => {
            Numeric::Float(match operator {
                Add => lhs + rhs,
                Subtract => lhs - rhs,
                Multiply => lhs * rhs,
                Divide => lhs / rhs,
                _ => lhs % rhs,
            })
        }

        (Numeric::Double(lhs), Numeric::Double(rhs)) => {
            Numeric::Double(match operator {
                Add => lhs + rhs,
                Subtract => lhs - rhs,
                Multiply => lhs * rhs,
                Divide => lhs / rhs,
                _ => lhs % rhs,
            })
        }

        (lhs, _) => lhs,
    })
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn shift(operator: BinaryOperator, lhs: Numeric, rhs: Numeric) -> Numeric {
    match lhs {
        Numeric::Int(lhs) => {
            let distance = rhs.shift_distance(31);

            Numeric::Int(match operator {
                BinaryOperator::ShiftLeft => lhs.wrapping_shl(distance),
                BinaryOperator::ShiftRight => lhs.wrapping_shr(distance),
                _ => ((lhs as u32) >> distance) as i32,
            })
        }
        Numeric::Long(lhs) => {
            let distance = rhs.shift_distance(63);

            Numeric::Long(match operator {
                BinaryOperator::ShiftLeft => lhs.wrapping_shl(distance),
                BinaryOperator::ShiftRight => lhs.wrapping_shr(distance),
                _ => ((lhs as u64) >> distance) as i64,
            })
        }
        other => other,
    }
}

fn bitwise(operator: BinaryOperator, lhs: Numeric, rhs: Numeric) -> Numeric {
    match (lhs, rhs) {
        (Numeric::Int(lhs), Numeric::Int(rhs)) => Numeric::Int(match operator {
            BinaryOperator::BitwiseAnd => lhs & rhs,
            BinaryOperator::BitwiseOr => lhs | rhs,
            _ => lhs ^ rhs,
        }),
        (Numeric::Long(lhs), Numeric::Long(rhs)) => {
            Numeric::Long(match operator {
                BinaryOperator::BitwiseAnd => lhs & rhs,
                BinaryOperator::BitwiseOr => lhs | rhs,
                _ => lhs ^ rhs,
            })
        }
        (lhs, _) => lhs,
    }
}

/// Evaluates `lhs OPERATOR rhs` on primitive values.
///
/// # Errors
///
/// Returns [`OperatorError::Unsupported`] when the operand values don't fit
/// the operator and [`ArithmeticError::DivisionByZero`] for integral `/` and
/// `%` by zero.
pub fn compute_binary(
    operator: BinaryOperator,
    lhs: &Value,
    rhs: &Value,
) -> Result<Value, OperatorError> {
    let (Some(lhs_type), Some(rhs_type)) = (primitive_of(lhs), primitive_of(rhs))
    else {
        return Err(OperatorError::unsupported(operator, "reference operand"));
    };

    let result_type = lhs_type
        .binary_result_type(operator, rhs_type)
        .ok_or_else(|| OperatorError::unsupported(operator, lhs_type))?;

    if let (Value::Boolean(lhs), Value::Boolean(rhs)) = (lhs, rhs) {
        let (lhs, rhs) = (*lhs, *rhs);

        return Ok(Value::Boolean(match operator {
            BinaryOperator::Equal => lhs == rhs,
            BinaryOperator::NotEqual => lhs != rhs,
            BinaryOperator::LogicalAnd | BinaryOperator::BitwiseAnd => lhs & rhs,
            BinaryOperator::LogicalOr | BinaryOperator::BitwiseOr => lhs | rhs,
            _ => lhs ^ rhs,
        }));
    }

    let (Some(lhs), Some(rhs)) = (Numeric::of(lhs), Numeric::of(rhs)) else {
        return Err(OperatorError::unsupported(operator, lhs_type));
    };

    let common = lhs_type.promoted_with(rhs_type);
    let (promoted_lhs, promoted_rhs) = (lhs.convert(common), rhs.convert(common));

    Ok(match operator {
        BinaryOperator::Add
        | BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Remainder => {
            arithmetic(operator, promoted_lhs, promoted_rhs)?.into_value()
        }

        BinaryOperator::Equal => Value::Boolean(promoted_lhs == promoted_rhs),
        BinaryOperator::NotEqual => Value::Boolean(promoted_lhs != promoted_rhs),
        BinaryOperator::Less => Value::Boolean(promoted_lhs < promoted_rhs),
        BinaryOperator::LessEqual => Value::Boolean(promoted_lhs <= promoted_rhs),
        BinaryOperator::Greater => Value::Boolean(promoted_lhs > promoted_rhs),
        BinaryOperator::GreaterEqual => {
            Value::Boolean(promoted_lhs >= promoted_rhs)
        }

        BinaryOperator::BitwiseAnd
        | BinaryOperator::BitwiseOr
        | BinaryOperator::BitwiseXor => {
            bitwise(operator, promoted_lhs, promoted_rhs).into_value()
        }

        BinaryOperator::ShiftLeft
        | BinaryOperator::ShiftRight
        | BinaryOperator::UnsignedShiftRight => {
            shift(operator, lhs.convert(result_type), rhs).into_value()
        }

        BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => {
            return Err(OperatorError::unsupported(operator, lhs_type))
        }
    })
}

/// Evaluates `OPERATOR value` on a primitive value.
///
/// # Errors
///
/// Returns [`OperatorError::Unsupported`] when the operand doesn't fit the
/// operator.
pub fn compute_unary(
    operator: UnaryOperator,
    value: &Value,
) -> Result<Value, OperatorError> {
    let operand = primitive_of(value)
        .ok_or_else(|| OperatorError::unsupported(operator, "reference operand"))?;
    operand
        .unary_result_type(operator)
        .ok_or_else(|| OperatorError::unsupported(operator, operand))?;

    if let Value::Boolean(value) = value {
        return Ok(Value::Boolean(!value));
    }

    let numeric = Numeric::of(value)
        .ok_or_else(|| OperatorError::unsupported(operator, operand))?;

    Ok(match (operator, numeric) {
        (UnaryOperator::Plus, numeric) => numeric.into_value(),
        (UnaryOperator::Negate, Numeric::Int(value)) => {
            Value::Int(value.wrapping_neg())
        }
        (UnaryOperator::Negate, Numeric::Long(value)) => {
            Value::Long(value.wrapping_neg())
        }
        (UnaryOperator::Negate, Numeric::Float(value)) => Value::Float(-value),
        (UnaryOperator::Negate, Numeric::Double(value)) => Value::Double(-value),
        (UnaryOperator::BitwiseNot, Numeric::Int(value)) => Value::Int(!value),
        (UnaryOperator::BitwiseNot, Numeric::Long(value)) => Value::Long(!value),
        (_, numeric) => {
            return Err(OperatorError::unsupported(operator, format!("{numeric:?}")))
        }
    })
}

#[cfg(test)]
mod test;

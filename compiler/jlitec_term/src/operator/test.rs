use jlitec_reflection::Value;
use proptest::{prop_assert_eq, proptest};

use crate::{
    operator::{
        compute_binary, compute_unary, ArithmeticError, BinaryOperator,
        OperatorError, UnaryOperator,
    },
    r#type::{Array, Primitive, Type},
};

#[test]
fn binary_numeric_promotion() {
    use Primitive::{Boolean, Char, Double, Float, Int, Long};

    assert_eq!(Int.binary_result_type(BinaryOperator::Add, Int), Some(Int));
    assert_eq!(Char.binary_result_type(BinaryOperator::Add, Char), Some(Int));
    assert_eq!(Int.binary_result_type(BinaryOperator::Add, Long), Some(Long));
    assert_eq!(Long.binary_result_type(BinaryOperator::Multiply, Float), Some(Float));
    assert_eq!(Float.binary_result_type(BinaryOperator::Divide, Double), Some(Double));
    assert_eq!(Int.binary_result_type(BinaryOperator::Less, Double), Some(Boolean));
    assert_eq!(Boolean.binary_result_type(BinaryOperator::Add, Int), None);
    assert_eq!(Boolean.binary_result_type(BinaryOperator::LogicalAnd, Boolean), Some(Boolean));
    assert_eq!(Boolean.binary_result_type(BinaryOperator::BitwiseXor, Boolean), Some(Boolean));
    assert_eq!(Double.binary_result_type(BinaryOperator::BitwiseAnd, Int), None);
    assert_eq!(Int.binary_result_type(BinaryOperator::ShiftLeft, Long), Some(Int));
    assert_eq!(Char.binary_result_type(BinaryOperator::ShiftLeft, Int), Some(Int));
}

#[test]
fn unary_typing() {
    assert_eq!(Primitive::Char.unary_result_type(UnaryOperator::Negate), Some(Primitive::Int));
    assert_eq!(Primitive::Boolean.unary_result_type(UnaryOperator::LogicalNot), Some(Primitive::Boolean));
    assert_eq!(Primitive::Double.unary_result_type(UnaryOperator::BitwiseNot), None);
    assert_eq!(Primitive::Int.unary_result_type(UnaryOperator::LogicalNot), None);
}

#[test]
fn arrays_are_unsupported() {
    let array = Type::Array(Array {
        element: Box::new(Type::Primitive(Primitive::Int)),
        dimension: 1,
    });

    assert!(matches!(
        array.binary_result_type(BinaryOperator::Add, &Type::Primitive(Primitive::Int)),
        Err(OperatorError::Unsupported { .. })
    ));
    assert!(matches!(
        Type::Primitive(Primitive::Int).binary_result_type(BinaryOperator::Add, &array),
        Err(OperatorError::Unsupported { .. })
    ));
    assert!(matches!(
        array.unary_result_type(UnaryOperator::Negate),
        Err(OperatorError::Unsupported { .. })
    ));
}

#[test]
fn division_by_zero() {
    assert_eq!(
        compute_binary(BinaryOperator::Divide, &Value::Int(1), &Value::Int(0)),
        Err(OperatorError::Arithmetic(ArithmeticError::DivisionByZero))
    );
    assert_eq!(
        compute_binary(BinaryOperator::Remainder, &Value::Long(1), &Value::Int(0)),
        Err(OperatorError::Arithmetic(ArithmeticError::DivisionByZero))
    );
    assert_eq!(
        compute_binary(BinaryOperator::Divide, &Value::Double(1.0), &Value::Int(0)),
        Ok(Value::Double(f64::INFINITY))
    );
}

#[test]
fn mixed_operands() {
    assert_eq!(
        compute_binary(BinaryOperator::Add, &Value::Char('a'), &Value::Int(1)),
        Ok(Value::Int(98))
    );
    assert_eq!(
        compute_binary(BinaryOperator::Add, &Value::Int(1), &Value::Long(2)),
        Ok(Value::Long(3))
    );
    assert_eq!(
        compute_binary(BinaryOperator::Less, &Value::Int(1), &Value::Double(1.5)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        compute_binary(BinaryOperator::LogicalOr, &Value::Boolean(false), &Value::Boolean(true)),
        Ok(Value::Boolean(true))
    );
    assert!(compute_binary(BinaryOperator::Add, &Value::from("a"), &Value::Int(1)).is_err());
}

#[test]
fn shifts_are_masked() {
    assert_eq!(
        compute_binary(BinaryOperator::ShiftLeft, &Value::Int(1), &Value::Int(33)),
        Ok(Value::Int(2))
    );
    assert_eq!(
        compute_binary(BinaryOperator::ShiftLeft, &Value::Long(1), &Value::Int(65)),
        Ok(Value::Long(2))
    );
    assert_eq!(
        compute_binary(BinaryOperator::UnsignedShiftRight, &Value::Int(-1), &Value::Int(28)),
        Ok(Value::Int(15))
    );
    assert_eq!(
        compute_binary(BinaryOperator::ShiftRight, &Value::Int(-16), &Value::Int(2)),
        Ok(Value::Int(-4))
    );
}

#[test]
fn unary_evaluation() {
    assert_eq!(compute_unary(UnaryOperator::Negate, &Value::Int(i32::MIN)), Ok(Value::Int(i32::MIN)));
    assert_eq!(compute_unary(UnaryOperator::BitwiseNot, &Value::Long(0)), Ok(Value::Long(-1)));
    assert_eq!(compute_unary(UnaryOperator::LogicalNot, &Value::Boolean(true)), Ok(Value::Boolean(false)));
    assert_eq!(compute_unary(UnaryOperator::Plus, &Value::Char('a')), Ok(Value::Int(97)));
    assert!(compute_unary(UnaryOperator::LogicalNot, &Value::Int(1)).is_err());
}

proptest! {
    #[test]
    fn int_arithmetic_wraps(lhs: i32, rhs: i32) {
        prop_assert_eq!(
            compute_binary(BinaryOperator::Add, &Value::Int(lhs), &Value::Int(rhs)),
            Ok(Value::Int(lhs.wrapping_add(rhs)))
        );
        prop_assert_eq!(
            compute_binary(BinaryOperator::Multiply, &Value::Int(lhs), &Value::Int(rhs)),
            Ok(Value::Int(lhs.wrapping_mul(rhs)))
        );
    }

    #[test]
    fn int_division_matches_truncation(lhs: i32, rhs in 1..i32::MAX) {
        prop_assert_eq!(
            compute_binary(BinaryOperator::Divide, &Value::Int(lhs), &Value::Int(rhs)),
            Ok(Value::Int(lhs / rhs))
        );
        prop_assert_eq!(
            compute_binary(BinaryOperator::Remainder, &Value::Int(lhs), &Value::Int(rhs)),
            Ok(Value::Int(lhs % rhs))
        );
    }

    #[test]
    fn long_comparison_matches(lhs: i64, rhs: i64) {
        prop_assert_eq!(
            compute_binary(BinaryOperator::GreaterEqual, &Value::Long(lhs), &Value::Long(rhs)),
            Ok(Value::Boolean(lhs >= rhs))
        );
    }
}

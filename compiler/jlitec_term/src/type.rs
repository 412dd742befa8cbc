//! Contains the definition of the [`Type`] term.

use enum_as_inner::EnumAsInner;
use jlitec_arena::ID;
use jlitec_reflection::Value;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::{
    class_like::{ClassLike, GenericParameter},
    operator::{BinaryOperator, OperatorError, UnaryOperator},
};

/// Contains all primitive types of the language, including the `void` and
/// `null` pseudo types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
    Serialize,
    Deserialize,
    derive_more::Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum Primitive {
    #[display(fmt = "void")]
    Void,
    #[display(fmt = "null")]
    Null,
    #[display(fmt = "int")]
    Int,
    #[display(fmt = "long")]
    Long,
    #[display(fmt = "float")]
    Float,
    #[display(fmt = "double")]
    Double,
    #[display(fmt = "boolean")]
    Boolean,
    #[display(fmt = "char")]
    Char,
}

impl Primitive {
    /// Returns `true` for `int`, `long`, `float`, `double` and `char`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Long | Self::Float | Self::Double | Self::Char
        )
    }

    /// Returns `true` for `int`, `long` and `char`.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Char)
    }

    /// The identifier of the wrapper class boxing this primitive.
    #[must_use]
    pub const fn boxed_identifier(self) -> Option<&'static str> {
        match self {
            Self::Int => Some("Integer"),
            Self::Long => Some("Long"),
            Self::Float => Some("Float"),
            Self::Double => Some("Double"),
            Self::Boolean => Some("Boolean"),
            Self::Char => Some("Character"),
            Self::Void | Self::Null => None,
        }
    }

    /// The primitive unboxed from the wrapper class with the given
    /// identifier.
    #[must_use]
    pub fn from_boxed_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "Integer" => Some(Self::Int),
            "Long" => Some(Self::Long),
            "Float" => Some(Self::Float),
            "Double" => Some(Self::Double),
            "Boolean" => Some(Self::Boolean),
            "Character" => Some(Self::Char),
            _ => None,
        }
    }

    /// Checks whether a value of this type converts implicitly to `target`.
    ///
    /// Identity counts as a conversion.
    #[must_use]
    pub const fn widens_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Void, Self::Void)
                | (Self::Null, Self::Null)
                | (Self::Boolean, Self::Boolean)
                | (Self::Char, Self::Char | Self::Int | Self::Long)
                | (Self::Int, Self::Int | Self::Long)
                | (Self::Long, Self::Long)
                | (
                    Self::Char | Self::Int | Self::Long | Self::Float,
                    Self::Float
                )
                | (
                    Self::Char | Self::Int | Self::Long | Self::Float | Self::Double,
                    Self::Double
                )
        )
    }

    /// The value an attribute of this type holds before assignment.
    #[must_use]
    pub const fn default_value(self) -> Value {
        match self {
            Self::Int => Value::Int(0),
            Self::Long => Value::Long(0),
            Self::Float => Value::Float(0.0),
            Self::Double => Value::Double(0.0),
            Self::Boolean => Value::Boolean(false),
            Self::Char => Value::Char('\0'),
            Self::Void | Self::Null => Value::Null,
        }
    }
}

/// Represents an array type, denoted by `ELEMENT[]...` syntax.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Array {
    /// The element type; never an array itself.
    pub element: Box<Type>,

    /// The number of `[]` groups, always at least one.
    pub dimension: usize,
}

/// Represents a type of the compiled language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
#[allow(missing_docs)]
pub enum Type {
    Primitive(Primitive),
    Array(Array),

    /// A class, interface or enum, possibly a specialisation of a generic
    /// one.
    ClassLike(ID<ClassLike>),

    /// A generic parameter that is not substituted yet.
    Parameter(ID<GenericParameter>),
}

impl Type {
    /// The `void` sentinel substituted for types that failed to parse.
    pub const VOID: Self = Self::Primitive(Primitive::Void);

    /// Wraps `element` into `dimension` array levels.
    ///
    /// A zero dimension returns the element unchanged; wrapping an array
    /// adds to its dimension instead of nesting.
    #[must_use]
    pub fn array(element: Self, dimension: usize) -> Self {
        if dimension == 0 {
            return element;
        }

        match element {
            Self::Array(Array { element, dimension: inner }) => {
                Self::Array(Array { element, dimension: inner + dimension })
            }
            element => {
                Self::Array(Array { element: Box::new(element), dimension })
            }
        }
    }

    /// Returns `true` for primitives other than `null`.
    #[must_use]
    pub const fn is_value_primitive(&self) -> bool {
        matches!(self, Self::Primitive(primitive) if !matches!(primitive, Primitive::Null))
    }

    /// Returns `true` if the type is `void`.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Void))
    }

    /// The value an attribute of this type holds before assignment.
    #[must_use]
    pub const fn default_value(&self) -> Value {
        match self {
            Self::Primitive(primitive) => primitive.default_value(),
            Self::Array(_) | Self::ClassLike(_) | Self::Parameter(_) => {
                Value::Null
            }
        }
    }

    /// The result type of `self OPERATOR rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::Unsupported`] if either operand isn't a
    /// primitive or the primitives don't support the operator.
    pub fn binary_result_type(
        &self,
        operator: BinaryOperator,
        rhs: &Self,
    ) -> Result<Primitive, OperatorError> {
        match (self, rhs) {
            (Self::Primitive(lhs), Self::Primitive(rhs)) => lhs
                .binary_result_type(operator, *rhs)
                .ok_or_else(|| OperatorError::unsupported(operator, lhs)),

            (Self::Array(_), _) | (_, Self::Array(_)) => {
                Err(OperatorError::unsupported(operator, "array"))
            }

            (Self::Primitive(_) | Self::ClassLike(_) | Self::Parameter(_), _) => {
                Err(OperatorError::unsupported(operator, "reference operand"))
            }
        }
    }

    /// The result type of `OPERATOR self`.
    ///
    /// # Errors
    ///
    /// See [`Self::binary_result_type`].
    pub fn unary_result_type(
        &self,
        operator: UnaryOperator,
    ) -> Result<Primitive, OperatorError> {
        match self {
            Self::Primitive(primitive) => primitive
                .unary_result_type(operator)
                .ok_or_else(|| OperatorError::unsupported(operator, primitive)),

            Self::Array(_) => Err(OperatorError::unsupported(operator, "array")),

            Self::ClassLike(_) | Self::Parameter(_) => {
                Err(OperatorError::unsupported(operator, "reference operand"))
            }
        }
    }
}

//! Method and attribute descriptors.

use jlitec_reflection::Executable;

use crate::{class_like::Visibility, r#type::Type};

/// A formal parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    #[allow(missing_docs)]
    pub identifier: String,

    #[allow(missing_docs)]
    pub r#type: Type,

    /// Whether the parameter was declared with `...`.
    pub is_ellipsis: bool,

    /// The slot of the parameter in the callee's stack frame.
    pub stack_position: usize,
}

/// A compiled method or constructor.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct MethodInfo {
    /// The method name; for constructors, the class name.
    pub identifier: String,

    /// The return type; [`None`] for constructors.
    pub return_type: Option<Type>,

    #[allow(missing_docs)]
    pub parameters: Vec<Parameter>,

    #[allow(missing_docs)]
    pub visibility: Visibility,

    #[allow(missing_docs)]
    pub is_abstract: bool,

    #[allow(missing_docs)]
    pub is_static: bool,

    #[allow(missing_docs)]
    pub is_final: bool,

    /// Whether a method of a subtype implements this method.
    pub is_virtual: bool,

    /// `name(type,type,...)`, built from the parameter types only.
    pub signature: String,

    /// The body linked from the native class.
    pub body: Option<Executable>,
}

impl MethodInfo {
    /// Returns `true` if the method is a constructor.
    #[must_use]
    pub const fn is_constructor(&self) -> bool { self.return_type.is_none() }

    /// Returns `true` if the last parameter is variadic.
    #[must_use]
    pub fn has_ellipsis(&self) -> bool {
        self.parameters.last().is_some_and(|x| x.is_ellipsis)
    }
}

/// A compiled attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    #[allow(missing_docs)]
    pub identifier: String,

    #[allow(missing_docs)]
    pub r#type: Type,

    #[allow(missing_docs)]
    pub visibility: Visibility,

    #[allow(missing_docs)]
    pub is_static: bool,

    #[allow(missing_docs)]
    pub is_final: bool,

    #[allow(missing_docs)]
    pub is_transient: bool,

    /// The storage slot. Instance attributes index the object's attribute
    /// vector; static attributes index the class's static values.
    pub index: usize,
}

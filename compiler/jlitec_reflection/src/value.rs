//! Runtime values shared between native method bodies and the interpreter.

use std::{fmt, sync::Arc};

use enum_as_inner::EnumAsInner;
use parking_lot::RwLock;

/// A heap object: the identifier of its runtime class and the flattened,
/// inheritance-ordered attribute storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Identifier of the class the object is an instance of.
    pub class_identifier: Arc<str>,

    /// Attribute slots; the superclass's slots come first.
    pub attributes: Vec<Value>,
}

impl Object {
    /// Allocates a new shared object.
    #[must_use]
    pub fn new_ref(
        class_identifier: impl Into<Arc<str>>,
        attributes: Vec<Value>,
    ) -> ObjectRef {
        Arc::new(RwLock::new(Self {
            class_identifier: class_identifier.into(),
            attributes,
        }))
    }
}

/// A shared, mutable reference to an [`Object`].
pub type ObjectRef = Arc<RwLock<Object>>;

/// A value of the compiled language.
#[derive(Debug, Clone, Default, EnumAsInner)]
#[allow(missing_docs)]
pub enum Value {
    #[default]
    Null,
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(Arc<str>),
    Object(ObjectRef),
}

impl PartialEq for Value {
    /// Primitives compare by value, objects by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Self::String(value.into()) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Long(value) => write!(f, "{value}L"),
            Self::Float(value) => write!(f, "{value:?}f"),
            Self::Double(value) => write!(f, "{value:?}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Char(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Object(object) => {
                let object = object.read();
                write!(f, "{}@{:p}", object.class_identifier, &*object)
            }
        }
    }
}

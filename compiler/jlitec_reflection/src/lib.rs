//! The contract a natively implemented class exposes to the library compiler.
//!
//! A library class never describes itself with data structures. Instead it
//! hands out plain signature strings (`"public class Exception extends
//! Throwable"`, `"private String message"`) together with the executable
//! bodies of its methods. The compiler parses the strings and builds the
//! type model; the bodies are linked into the compiled methods untouched.

use std::fmt::Debug;

use enum_as_inner::EnumAsInner;

pub mod declaration;
pub mod value;

pub use declaration::Declaration;
pub use value::{Object, ObjectRef, Value};

/// A native method body.
///
/// The body receives the call [`Frame`] and either returns the produced
/// value or throws. `void` methods return [`Value::Null`]; constructors
/// return the receiver.
pub type NativeFunction = fn(&mut Frame) -> Result<Value, Throw>;

/// A body whose evaluation is carried out by the tree-walking interpreter.
///
/// The compiler only stores it; the expression source is handed back
/// verbatim when the method is invoked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expression(pub String);

/// The executable body attached to a method signature.
#[derive(Debug, Clone, EnumAsInner)]
pub enum Executable {
    /// Implemented in Rust.
    Native(NativeFunction),

    /// A precompiled expression tree.
    Expression(Expression),
}

/// Implemented by every natively implemented class that is made visible to
/// the compiled language.
pub trait LibraryClass: Debug + Send + Sync {
    /// The one-line declaration header, e.g.
    /// `"public class ArithmeticException extends Exception"`.
    fn signature(&self) -> String;

    /// Method signatures paired with their bodies, in declaration order.
    fn methods(&self) -> Vec<(String, Executable)>;

    /// Attribute signatures in declaration order, e.g. `"private String
    /// message"`.
    fn attributes(&self) -> Vec<String>;

    /// Initial values of static attributes keyed by attribute identifier.
    fn static_values(&self) -> Vec<(String, Value)> { Vec::new() }

    /// Enum constants in ordinal order. Ignored for classes and interfaces.
    fn enum_constants(&self) -> Vec<String> { Vec::new() }
}

/// The call frame handed to a [`NativeFunction`].
#[derive(Debug, Clone)]
pub struct Frame {
    /// The receiver; [`Value::Null`] for static methods.
    pub this: Value,

    /// The arguments in parameter order.
    pub arguments: Vec<Value>,

    /// The first attribute index of the class declaring the invoked method.
    ///
    /// Native bodies address their own attributes relative to this offset so
    /// that they keep working inside subclass instances.
    pub first_attribute_index: usize,
}

impl Frame {
    /// Creates a frame for a static call.
    #[must_use]
    pub const fn new_static(arguments: Vec<Value>) -> Self {
        Self { this: Value::Null, arguments, first_attribute_index: 0 }
    }

    /// Returns the argument at `index`.
    ///
    /// # Errors
    ///
    /// See [`Throw::ArgumentCount`].
    pub fn argument(&self, index: usize) -> Result<&Value, Throw> {
        self.arguments.get(index).ok_or(Throw::ArgumentCount {
            expected: index + 1,
            found: self.arguments.len(),
        })
    }

    /// Returns the receiver object.
    ///
    /// # Errors
    ///
    /// See [`Throw::NullReceiver`].
    pub fn receiver(&self) -> Result<&ObjectRef, Throw> {
        self.this.as_object().ok_or(Throw::NullReceiver)
    }

    /// Reads the receiver's own attribute at `offset`, relative to
    /// [`Self::first_attribute_index`].
    ///
    /// # Errors
    ///
    /// Returns [`Throw::NullReceiver`] if there's no receiver and
    /// [`Throw::AttributeOutOfBounds`] if the slot doesn't exist.
    pub fn attribute(&self, offset: usize) -> Result<Value, Throw> {
        let index = self.first_attribute_index + offset;

        self.receiver()?
            .read()
            .attributes
            .get(index)
            .cloned()
            .ok_or(Throw::AttributeOutOfBounds { index })
    }

    /// Writes the receiver's own attribute at `offset`.
    ///
    /// # Errors
    ///
    /// See [`Self::attribute`].
    pub fn set_attribute(&self, offset: usize, value: Value) -> Result<(), Throw> {
        let index = self.first_attribute_index + offset;
        let mut object = self.receiver()?.write();

        let slot = object
            .attributes
            .get_mut(index)
            .ok_or(Throw::AttributeOutOfBounds { index })?;
        *slot = value;

        Ok(())
    }
}

/// Abrupt completion of a native method.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Throw {
    /// A language-level exception of the given class.
    #[error("{class_identifier}: {message}")]
    Exception {
        /// Identifier of the thrown exception class.
        class_identifier: String,

        /// The exception message.
        message: String,
    },

    /// The method was called with too few arguments.
    #[error("expected at least {expected} argument(s), found {found}")]
    ArgumentCount {
        /// Minimum number of arguments required.
        expected: usize,

        /// Number of arguments passed.
        found: usize,
    },

    /// An argument holds a value of the wrong kind.
    #[error("argument {index} has an unexpected value `{found}`")]
    ArgumentType {
        /// Position of the argument.
        index: usize,

        /// The rendered value.
        found: String,
    },

    /// An instance method was called without a receiver.
    #[error("the receiver is null")]
    NullReceiver,

    /// The receiver has no attribute slot at the given index.
    #[error("attribute index {index} is out of bounds")]
    AttributeOutOfBounds {
        /// The absolute slot index.
        index: usize,
    },
}

impl Throw {
    /// Creates a [`Throw::Exception`].
    #[must_use]
    pub fn exception(
        class_identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Exception {
            class_identifier: class_identifier.into(),
            message: message.into(),
        }
    }
}

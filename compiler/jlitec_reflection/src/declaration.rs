//! A plain-data [`LibraryClass`] for classes assembled at runtime.

use crate::{Executable, LibraryClass, Value};

/// A library class declaration given as data rather than as a dedicated
/// type.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    /// The one-line declaration header.
    pub signature: String,

    /// Method signatures paired with their bodies.
    pub methods: Vec<(String, Executable)>,

    /// Attribute signatures.
    pub attributes: Vec<String>,

    /// Initial values of static attributes.
    pub static_values: Vec<(String, Value)>,

    /// Enum constants in ordinal order.
    pub enum_constants: Vec<String>,
}

impl Declaration {
    /// Creates a declaration without members.
    #[must_use]
    pub fn new(signature: impl Into<String>) -> Self {
        Self { signature: signature.into(), ..Self::default() }
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(
        mut self,
        signature: impl Into<String>,
        body: Executable,
    ) -> Self {
        self.methods.push((signature.into(), body));
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, signature: impl Into<String>) -> Self {
        self.attributes.push(signature.into());
        self
    }

    /// Sets the initial value of a static attribute.
    #[must_use]
    pub fn with_static_value(
        mut self,
        identifier: impl Into<String>,
        value: Value,
    ) -> Self {
        self.static_values.push((identifier.into(), value));
        self
    }

    /// Appends an enum constant.
    #[must_use]
    pub fn with_enum_constant(mut self, identifier: impl Into<String>) -> Self {
        self.enum_constants.push(identifier.into());
        self
    }
}

impl LibraryClass for Declaration {
    fn signature(&self) -> String { self.signature.clone() }

    fn methods(&self) -> Vec<(String, Executable)> { self.methods.clone() }

    fn attributes(&self) -> Vec<String> { self.attributes.clone() }

    fn static_values(&self) -> Vec<(String, Value)> {
        self.static_values.clone()
    }

    fn enum_constants(&self) -> Vec<String> { self.enum_constants.clone() }
}

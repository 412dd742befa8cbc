//! Contains the class-like nodes of the type model and their generic
//! parameters.

use std::{collections::HashMap, sync::Arc};

use enum_as_inner::EnumAsInner;
use jlitec_arena::ID;
use jlitec_reflection::{LibraryClass, Value};
use serde::{Deserialize, Serialize};

use crate::{
    member::{AttributeInfo, MethodInfo},
    r#type::Type,
};

/// The access level of a class-like or member.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[allow(missing_docs)]
pub enum Visibility {
    #[default]
    #[display(fmt = "public")]
    Public,
    #[display(fmt = "protected")]
    Protected,
    #[display(fmt = "private")]
    Private,
}

/// A generic parameter declared by a class or interface, e.g. `T` in
/// `class Box<T extends Comparable<T>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParameter {
    /// The name of the parameter.
    pub identifier: String,

    /// The class-like declaring the parameter.
    pub owner: ID<ClassLike>,

    /// Upper bounds in declaration order (`extends A & B`).
    pub extends: Vec<Type>,

    /// The lower bound (`super T`), if any.
    pub super_bound: Option<Type>,
}

impl GenericParameter {
    /// Creates a placeholder without bounds.
    #[must_use]
    pub const fn new(identifier: String, owner: ID<ClassLike>) -> Self {
        Self { identifier, owner, extends: Vec::new(), super_bound: None }
    }
}

/// Class specific data.
#[derive(Debug, Clone, Default)]
pub struct Class {
    /// The superclass; `None` only for the root `Object` class.
    pub superclass: Option<ID<ClassLike>>,

    /// Implemented interfaces in declaration order.
    pub interfaces: Vec<ID<ClassLike>>,

    /// Whether instances can't be created directly.
    pub is_abstract: bool,
}

/// Interface specific data.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    /// Extended interfaces in declaration order.
    pub extended: Vec<ID<ClassLike>>,
}

/// A constant of an enum together with its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumConstant {
    #[allow(missing_docs)]
    pub identifier: String,

    #[allow(missing_docs)]
    pub ordinal: usize,
}

/// Enum specific data.
#[derive(Debug, Clone, Default)]
pub struct Enum {
    /// Implemented interfaces in declaration order.
    pub interfaces: Vec<ID<ClassLike>>,

    /// The fixed, ordered set of constants.
    pub constants: Vec<EnumConstant>,
}

/// The variant-specific part of a [`ClassLike`].
#[derive(Debug, Clone, EnumAsInner)]
#[allow(missing_docs)]
pub enum Kind {
    Class(Class),
    Interface(Interface),
    Enum(Enum),
}

impl Kind {
    /// The declaration keyword of the variant.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Interface(_) => "interface",
            Self::Enum(_) => "enum",
        }
    }
}

/// The runtime storage layout of a class-like.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// The slot where the class-like's own instance attributes begin; equals
    /// the superclass's attribute count.
    pub first_attribute_index: usize,

    /// The value of every instance slot of a fresh object, inherited slots
    /// first.
    pub initial_values: Vec<Value>,

    /// The values of the static attributes, indexed by
    /// [`AttributeInfo::index`] of the static attributes.
    pub static_values: Vec<Value>,
}

/// Records that a class-like is an instantiation of a generic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specialization {
    /// The generic class-like that was instantiated.
    pub base: ID<ClassLike>,

    /// One argument per generic parameter of the base.
    pub arguments: Vec<Type>,

    /// The canonical signature, e.g. `HashMap<String, Integer>`.
    pub signature: String,

    /// Nesting depth of the arguments; closed non-generic arguments count
    /// as zero.
    pub depth: usize,

    /// Whether the members and hierarchy have been substituted already.
    pub is_materialized: bool,
}

/// A class, interface or enum.
///
/// Specialisations of generic class-likes are class-likes themselves; they
/// carry a [`Specialization`] record and no generic parameters of their own.
#[derive(Debug, Clone)]
pub struct ClassLike {
    /// The declared name. Specialisations keep the name of their base.
    pub identifier: String,

    #[allow(missing_docs)]
    pub visibility: Visibility,

    /// Whether the class-like was declared `final`.
    pub is_final: bool,

    #[allow(missing_docs)]
    pub kind: Kind,

    /// Declared generic parameters in order.
    pub generic_parameters: Vec<ID<GenericParameter>>,

    /// Declared methods in declaration order.
    pub methods: Vec<MethodInfo>,

    /// Declared attributes in declaration order.
    pub attributes: Vec<AttributeInfo>,

    #[allow(missing_docs)]
    pub layout: Layout,

    /// Instantiations that still mention a generic parameter of this
    /// class-like, keyed by canonical signature.
    pub local_cache: HashMap<String, ID<ClassLike>>,

    /// The native class this class-like was compiled from.
    pub prototype: Option<Arc<dyn LibraryClass>>,

    /// Present if this class-like is an instantiation.
    pub specialization: Option<Specialization>,
}

impl ClassLike {
    /// Creates an empty class-like as produced by signature intake.
    #[must_use]
    pub fn new(identifier: String, visibility: Visibility, kind: Kind) -> Self {
        Self {
            identifier,
            visibility,
            is_final: false,
            kind,
            generic_parameters: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            layout: Layout::default(),
            local_cache: HashMap::new(),
            prototype: None,
            specialization: None,
        }
    }

    /// The canonical signature: the instantiation signature for
    /// specialisations, the identifier otherwise.
    #[must_use]
    pub fn signature(&self) -> &str {
        self.specialization
            .as_ref()
            .map_or(self.identifier.as_str(), |x| x.signature.as_str())
    }

    /// Returns `true` for abstract classes and interfaces.
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        match &self.kind {
            Kind::Class(class) => class.is_abstract,
            Kind::Interface(_) => true,
            Kind::Enum(_) => false,
        }
    }

    /// The direct supertypes: superclass first, then interfaces.
    #[must_use]
    pub fn supertypes(&self) -> Vec<ID<ClassLike>> {
        match &self.kind {
            Kind::Class(class) => class
                .superclass
                .iter()
                .chain(class.interfaces.iter())
                .copied()
                .collect(),
            Kind::Interface(interface) => interface.extended.clone(),
            Kind::Enum(enumeration) => enumeration.interfaces.clone(),
        }
    }

    /// The superclass, for classes only.
    #[must_use]
    pub fn superclass(&self) -> Option<ID<ClassLike>> {
        self.kind.as_class().and_then(|x| x.superclass)
    }

    /// The number of instance slots of an object of this class-like.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.layout.first_attribute_index
            + self.attributes.iter().filter(|x| !x.is_static).count()
    }

    /// Looks up an own method by its signature.
    #[must_use]
    pub fn method(&self, signature: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|x| x.signature == signature)
    }

    /// Looks up an own attribute by its identifier.
    #[must_use]
    pub fn attribute(&self, identifier: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|x| x.identifier == identifier)
    }
}

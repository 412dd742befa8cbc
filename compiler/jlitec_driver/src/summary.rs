//! A serialisable view of a compiled [`Library`].

use std::fmt;

use itertools::Itertools;
use jlitec_term::{
    class_like::{ClassLike, Visibility},
    library::Library,
    member::{AttributeInfo, MethodInfo},
};
use serde::{Deserialize, Serialize};

/// A declared class-like as it appears in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLikeSummary {
    /// `class`, `interface` or `enum`.
    pub keyword: String,

    #[allow(missing_docs)]
    pub identifier: String,

    #[allow(missing_docs)]
    pub visibility: Visibility,

    /// Each generic parameter with its bounds, e.g. `T extends Comparable<T>`.
    pub generic_parameters: Vec<String>,

    /// The canonical signatures of the direct supertypes.
    pub supertypes: Vec<String>,

    /// The slot of the first own instance attribute.
    pub first_attribute_index: usize,

    /// `visibility [static] type identifier @slot`
    pub attributes: Vec<String>,

    /// `visibility [static] [abstract] [return type] signature`
    pub methods: Vec<String>,

    /// Enum constants in ordinal order.
    pub constants: Vec<String>,
}

/// Everything the driver prints about a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySummary {
    /// The declared class-likes in registration order.
    pub class_likes: Vec<ClassLikeSummary>,

    /// The canonical signatures of the closed instantiations, sorted.
    pub instantiations: Vec<String>,
}

impl LibrarySummary {
    /// Summarises the declared class-likes of the library.
    #[must_use]
    pub fn new(library: &Library) -> Self {
        let class_likes = library
            .types()
            .iter()
            .filter_map(|x| library.class_like(*x))
            .map(|x| summarize(library, x))
            .collect();

        let mut instantiations =
            library.type_cache().keys().cloned().collect::<Vec<_>>();
        instantiations.sort();

        Self { class_likes, instantiations }
    }
}

fn summarize(library: &Library, class_like: &ClassLike) -> ClassLikeSummary {
    let generic_parameters = class_like
        .generic_parameters
        .iter()
        .filter_map(|x| library.generic_parameter(*x))
        .map(|x| {
            let mut parameter = x.identifier.clone();

            if !x.extends.is_empty() {
                parameter.push_str(" extends ");
                parameter.push_str(
                    &x.extends.iter().map(|x| library.signature_of(x)).join(" & "),
                );
            }

            if let Some(bound) = &x.super_bound {
                parameter.push_str(" super ");
                parameter.push_str(&library.signature_of(bound));
            }

            parameter
        })
        .collect();

    ClassLikeSummary {
        keyword: class_like.kind.keyword().to_owned(),
        identifier: class_like.identifier.clone(),
        visibility: class_like.visibility,
        generic_parameters,
        supertypes: class_like
            .supertypes()
            .into_iter()
            .filter_map(|x| library.class_like(x))
            .map(|x| x.signature().to_owned())
            .collect(),
        first_attribute_index: class_like.layout.first_attribute_index,
        attributes: class_like
            .attributes
            .iter()
            .map(|x| attribute(library, x))
            .collect(),
        methods: class_like.methods.iter().map(|x| method(library, x)).collect(),
        constants: class_like
            .kind
            .as_enum()
            .map(|x| x.constants.iter().map(|x| x.identifier.clone()).collect())
            .unwrap_or_default(),
    }
}

fn attribute(library: &Library, attribute: &AttributeInfo) -> String {
    format!(
        "{}{} {} {} @{}",
        attribute.visibility,
        if attribute.is_static { " static" } else { "" },
        library.signature_of(&attribute.r#type),
        attribute.identifier,
        attribute.index
    )
}

fn method(library: &Library, method: &MethodInfo) -> String {
    let mut text = method.visibility.to_string();

    if method.is_static {
        text.push_str(" static");
    }
    if method.is_abstract {
        text.push_str(" abstract");
    }
    if let Some(return_type) = &method.return_type {
        text.push(' ');
        text.push_str(&library.signature_of(return_type));
    }

    text.push(' ');
    text.push_str(&method.signature);

    if method.is_virtual {
        text.push_str(" (virtual)");
    }

    text
}

impl fmt::Display for LibrarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class_like in &self.class_likes {
            write!(f, "{} {}", class_like.keyword, class_like.identifier)?;

            if !class_like.generic_parameters.is_empty() {
                write!(f, "<{}>", class_like.generic_parameters.join(", "))?;
            }
            if !class_like.supertypes.is_empty() {
                write!(f, " : {}", class_like.supertypes.join(", "))?;
            }
            writeln!(f, " [first slot {}]", class_like.first_attribute_index)?;

            for constant in &class_like.constants {
                writeln!(f, "    {constant}")?;
            }
            for attribute in &class_like.attributes {
                writeln!(f, "    {attribute}")?;
            }
            for method in &class_like.methods {
                writeln!(f, "    {method}")?;
            }
        }

        if !self.instantiations.is_empty() {
            writeln!(f, "instantiations: {}", self.instantiations.join(", "))?;
        }

        Ok(())
    }
}

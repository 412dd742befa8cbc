//! Contains the diagnostics reported while compiling a library.

use std::{any::Any, fmt::Debug};

use jlitec_arena::ID;
use jlitec_diagnostic::{Diagnostic as DiagnosticReport, Report, Severity};
use jlitec_term::{class_like::ClassLike, library::Library};

/// Implemented by all diagnostic objects.
pub trait Diagnostic:
    for<'a> Report<&'a Library> + Debug + Any + Send + Sync + 'static
{
    #[allow(missing_docs)]
    fn as_any(&self) -> &dyn Any;

    #[allow(missing_docs)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<U: for<'a> Report<&'a Library> + Debug + Any + Send + Sync + 'static>
    Diagnostic for U
{
    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

impl<U: for<'a> Report<&'a Library> + Debug + Any + Send + Sync + 'static>
    From<U> for Box<dyn Diagnostic>
{
    fn from(value: U) -> Self { Box::new(value) }
}

fn name_of(library: &Library, id: ID<ClassLike>) -> &str {
    library.class_like(id).map_or("<unknown>", ClassLike::signature)
}

const fn strict_severity(strict: bool) -> Severity {
    if strict {
        Severity::Error
    } else {
        Severity::Warning
    }
}

/// The signature couldn't be tokenized cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexical {
    /// The signature being tokenized.
    pub signature: String,

    #[allow(missing_docs)]
    pub error: jlitec_lexical::error::Error,
}

impl Report<&Library> for Lexical {
    fn report(&self, _: &Library) -> DiagnosticReport {
        self.error.report(self.signature.as_str())
    }
}

/// A token other than the expected one was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnexpectedToken {
    #[allow(missing_docs)]
    pub signature: String,

    /// A description of what the parser was looking for.
    pub expected: String,

    /// The token that was found instead.
    pub found: String,
}

impl Report<&Library> for UnexpectedToken {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "expected {}, found `{}`",
                self.expected, self.found
            ),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: None,
        }
    }
}

/// A type was expected but the signature ended or continued with something
/// else. The type is taken as `void`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpectedType {
    #[allow(missing_docs)]
    pub signature: String,

    /// The token that was found instead.
    pub found: String,
}

impl Report<&Library> for ExpectedType {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!("expected a type, found `{}`", self.found),
            severity: Severity::Warning,
            signature: Some(self.signature.clone()),
            help_message: Some("the type is assumed to be `void`".to_owned()),
        }
    }
}

/// No primitive, generic parameter or class-like has the identifier. The
/// type is taken as `Object`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownType {
    #[allow(missing_docs)]
    pub signature: String,

    /// The unresolved identifier.
    pub identifier: String,
}

impl Report<&Library> for UnknownType {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!("unknown type `{}`", self.identifier),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: Some("the type is assumed to be `Object`".to_owned()),
        }
    }
}

/// A declaration header doesn't start with `class`, `interface` or `enum`
/// after its modifiers. The declaration is skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnrecognizedDeclarationKeyword {
    #[allow(missing_docs)]
    pub signature: String,

    /// The token found in place of the keyword.
    pub found: String,

    /// Whether the compilation runs in strict mode.
    pub strict: bool,
}

impl Report<&Library> for UnrecognizedDeclarationKeyword {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "expected `class`, `interface` or `enum`, found `{}`",
                self.found
            ),
            severity: strict_severity(self.strict),
            signature: Some(self.signature.clone()),
            help_message: Some("the declaration is skipped".to_owned()),
        }
    }
}

/// A generic class-like received the wrong number of type arguments.
/// Missing arguments become `Object`; extra arguments are dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MismatchedGenericArgumentCount {
    #[allow(missing_docs)]
    pub signature: String,

    /// The instantiated class-like.
    pub class_like: ID<ClassLike>,

    /// The number of declared generic parameters.
    pub expected: usize,

    /// The number of supplied arguments.
    pub found: usize,

    /// Whether the compilation runs in strict mode.
    pub strict: bool,
}

impl Report<&Library> for MismatchedGenericArgumentCount {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` expects {} generic argument(s) but {} were supplied",
                name_of(library, self.class_like),
                self.expected,
                self.found
            ),
            severity: strict_severity(self.strict),
            signature: Some(self.signature.clone()),
            help_message: None,
        }
    }
}

/// An interface header used `implements`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImplementsOnInterface {
    #[allow(missing_docs)]
    pub signature: String,
}

impl Report<&Library> for ImplementsOnInterface {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: "an interface can't implement other interfaces".to_owned(),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: Some("use `extends` instead".to_owned()),
        }
    }
}

/// What a supertype clause accepts at a given position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
pub enum SupertypeKind {
    /// `class X extends ...`
    #[display(fmt = "a class")]
    Class,

    /// `implements ...` and `interface X extends ...`
    #[display(fmt = "an interface")]
    Interface,

    /// `enum X extends ...` accepts nothing.
    #[display(fmt = "no superclass")]
    Nothing,
}

/// A supertype clause names a class-like of the wrong kind. The clause is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvalidSupertype {
    #[allow(missing_docs)]
    pub signature: String,

    /// The rejected supertype.
    pub supertype: ID<ClassLike>,

    /// What the clause accepts.
    pub expected: SupertypeKind,
}

impl Report<&Library> for InvalidSupertype {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` can't be used here, expected {}",
                name_of(library, self.supertype),
                self.expected
            ),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: None,
        }
    }
}

/// A supertype or generic bound isn't a class-like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpectedClassLike {
    #[allow(missing_docs)]
    pub signature: String,

    /// The signature of the type found instead.
    pub found: String,
}

impl Report<&Library> for ExpectedClassLike {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "expected a class, interface or enum, found `{}`",
                self.found
            ),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: None,
        }
    }
}

/// A class extends more than one class; only the first superclass is kept.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MultipleSuperclasses {
    #[allow(missing_docs)]
    pub signature: String,

    /// The superclass named first.
    pub existing: ID<ClassLike>,

    /// The superclass dropped from the clause.
    pub ignored: ID<ClassLike>,
}

impl Report<&Library> for MultipleSuperclasses {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "a class can only extend one class, `{}` is ignored",
                name_of(library, self.ignored)
            ),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: Some(format!(
                "the superclass stays `{}`",
                name_of(library, self.existing)
            )),
        }
    }
}

/// Two declarations share an identifier; the later one is skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RedefinedClassLike {
    /// The class-like registered first.
    pub existing: ID<ClassLike>,

    /// The header of the skipped declaration.
    pub signature: String,
}

impl Report<&Library> for RedefinedClassLike {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` is already defined",
                name_of(library, self.existing)
            ),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: Some("the declaration is skipped".to_owned()),
        }
    }
}

/// A class-like declares the same method signature or attribute identifier
/// twice; the later member is skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RedefinedMember {
    /// The class-like declaring the member.
    pub class_like: ID<ClassLike>,

    /// The method signature or attribute identifier.
    pub member: String,
}

impl Report<&Library> for RedefinedMember {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` declares `{}` more than once",
                name_of(library, self.class_like),
                self.member
            ),
            severity: Severity::Error,
            signature: None,
            help_message: None,
        }
    }
}

/// `...` was used on a parameter that isn't the last one. The parameter is
/// compiled as a plain one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MisplacedEllipsis {
    #[allow(missing_docs)]
    pub signature: String,

    /// The parameter carrying the ellipsis.
    pub parameter: String,
}

impl Report<&Library> for MisplacedEllipsis {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "only the last parameter can be variadic, `{}` isn't",
                self.parameter
            ),
            severity: Severity::Error,
            signature: Some(self.signature.clone()),
            help_message: None,
        }
    }
}

/// An instantiation nests deeper than
/// [`Options::max_specialization_depth`](crate::Options). The raw generic
/// class-like is used instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecializationDepthExceeded {
    /// The canonical signature of the refused instantiation.
    pub signature: String,

    /// The configured maximum.
    pub maximum: usize,
}

impl Report<&Library> for SpecializationDepthExceeded {
    fn report(&self, _: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` nests instantiations deeper than {}",
                self.signature, self.maximum
            ),
            severity: Severity::Warning,
            signature: Some(self.signature.clone()),
            help_message: Some(
                "the raw generic class-like is used instead".to_owned(),
            ),
        }
    }
}

/// A native class supplies an initial value for a name that isn't one of
/// its static attributes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownStaticValue {
    #[allow(missing_docs)]
    pub class_like: ID<ClassLike>,

    /// The name the value was supplied for.
    pub identifier: String,
}

impl Report<&Library> for UnknownStaticValue {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` has no static attribute `{}`",
                name_of(library, self.class_like),
                self.identifier
            ),
            severity: Severity::Warning,
            signature: None,
            help_message: None,
        }
    }
}

/// The superclass chain of a class leads back to the class itself. The
/// superclass is reset to `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CyclicInheritance {
    #[allow(missing_docs)]
    pub class_like: ID<ClassLike>,
}

impl Report<&Library> for CyclicInheritance {
    fn report(&self, library: &Library) -> DiagnosticReport {
        DiagnosticReport {
            message: format!(
                "`{}` inherits from itself",
                name_of(library, self.class_like)
            ),
            severity: Severity::Error,
            signature: None,
            help_message: None,
        }
    }
}

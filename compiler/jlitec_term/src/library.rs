//! Contains the [`Library`], the type model produced by one compilation.

use std::collections::{HashMap, HashSet, VecDeque};

use getset::Getters;
use jlitec_arena::{Arena, ID};
use jlitec_reflection::{
    Executable, Expression, Frame, Object, ObjectRef, Throw, Value,
};

use crate::{
    class_like::{ClassLike, GenericParameter, Kind},
    member::MethodInfo,
    r#type::{Primitive, Type},
};

/// The identifier of the root class every class-like converts to.
pub const OBJECT: &str = "Object";

/// The compiled class-likes of a library together with the global
/// instantiation cache.
///
/// A library is built once and shared read-only afterwards. Class-likes and
/// generic parameters live in arenas so that nodes can refer to each other
/// before they are complete.
#[derive(Debug, Default, Getters)]
pub struct Library {
    class_likes: Arena<ClassLike>,
    generic_parameters: Arena<GenericParameter>,

    /// The declared class-likes in registration order. Specialisations are
    /// not listed.
    #[get = "pub"]
    types: Vec<ID<ClassLike>>,

    identifiers: HashMap<String, ID<ClassLike>>,

    /// Closed instantiations keyed by canonical signature.
    #[get = "pub"]
    type_cache: HashMap<String, ID<ClassLike>>,
}

/// The class-like can't be instantiated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum InstantiateError {
    #[error("no class-like with the given ID exists")]
    UnknownClassLike,

    #[error("`{0}` is abstract")]
    Abstract(String),

    #[error("`{0}` is an interface")]
    Interface(String),

    #[error("`{0}` is an enum; its constants are its only instances")]
    Enum(String),
}

/// The method couldn't be invoked.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(missing_docs)]
pub enum InvokeError {
    #[error("no class-like with the given ID exists")]
    UnknownClassLike,

    #[error("no method `{0}` found")]
    MethodNotFound(String),

    #[error("method `{0}` has no body")]
    NoBody(String),

    #[error(transparent)]
    Throw(#[from] Throw),
}

/// The outcome of a successful [`Library::invoke`].
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// The native body ran and produced the value.
    Returned(Value),

    /// The body is an expression tree that the caller has to evaluate.
    ExpressionBody(Expression),
}

impl Library {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a declared class-like under its identifier.
    ///
    /// # Errors
    ///
    /// Returns the ID of the already registered class-like if the
    /// identifier is taken.
    pub fn register(
        &mut self,
        class_like: ClassLike,
    ) -> Result<ID<ClassLike>, ID<ClassLike>> {
        if let Some(existing) = self.identifiers.get(&class_like.identifier) {
            return Err(*existing);
        }

        let identifier = class_like.identifier.clone();
        let id = self.class_likes.insert(class_like);

        self.identifiers.insert(identifier, id);
        self.types.push(id);

        Ok(id)
    }

    /// Adds a specialisation; it is reachable through the caches only.
    pub fn insert_specialization(
        &mut self,
        class_like: ClassLike,
    ) -> ID<ClassLike> {
        self.class_likes.insert(class_like)
    }

    /// Adds a generic parameter.
    pub fn insert_generic_parameter(
        &mut self,
        generic_parameter: GenericParameter,
    ) -> ID<GenericParameter> {
        self.generic_parameters.insert(generic_parameter)
    }

    /// Stores a closed instantiation in the global cache.
    pub fn cache(&mut self, signature: String, id: ID<ClassLike>) {
        self.type_cache.insert(signature, id);
    }

    /// Looks up a closed instantiation in the global cache.
    #[must_use]
    pub fn cached(&self, signature: &str) -> Option<ID<ClassLike>> {
        self.type_cache.get(signature).copied()
    }

    /// Looks up a declared class-like by identifier.
    #[must_use]
    pub fn get_by_identifier(&self, identifier: &str) -> Option<ID<ClassLike>> {
        self.identifiers.get(identifier).copied()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn class_like(&self, id: ID<ClassLike>) -> Option<&ClassLike> {
        self.class_likes.get(id)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn class_like_mut(
        &mut self,
        id: ID<ClassLike>,
    ) -> Option<&mut ClassLike> {
        self.class_likes.get_mut(id)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn generic_parameter(
        &self,
        id: ID<GenericParameter>,
    ) -> Option<&GenericParameter> {
        self.generic_parameters.get(id)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn generic_parameter_mut(
        &mut self,
        id: ID<GenericParameter>,
    ) -> Option<&mut GenericParameter> {
        self.generic_parameters.get_mut(id)
    }

    /// Iterates over every class-like, specialisations included, in
    /// creation order.
    pub fn class_likes(
        &self,
    ) -> impl ExactSizeIterator<Item = (ID<ClassLike>, &ClassLike)> {
        self.class_likes.iter()
    }

    /// The generic class-like a specialisation was instantiated from, or
    /// `id` itself.
    #[must_use]
    pub fn base_of(&self, id: ID<ClassLike>) -> ID<ClassLike> {
        self.class_like(id)
            .and_then(|x| x.specialization.as_ref())
            .map_or(id, |x| x.base)
    }

    /// Returns `true` if `id` is the root `Object` class.
    #[must_use]
    pub fn is_object(&self, id: ID<ClassLike>) -> bool {
        self.get_by_identifier(OBJECT) == Some(id)
    }

    /// The canonical signature of a type, e.g. `int[][]` or
    /// `HashMap<String, List<T>>`.
    #[must_use]
    pub fn signature_of(&self, r#type: &Type) -> String {
        match r#type {
            Type::Primitive(primitive) => primitive.to_string(),
            Type::Array(array) => format!(
                "{}{}",
                self.signature_of(&array.element),
                "[]".repeat(array.dimension)
            ),
            Type::ClassLike(id) => self
                .class_like(*id)
                .map_or_else(|| OBJECT.to_owned(), |x| x.signature().to_owned()),
            Type::Parameter(id) => self
                .generic_parameter(*id)
                .map_or_else(String::new, |x| x.identifier.clone()),
        }
    }

    /// The key instantiations are cached by. Unlike [`Self::signature_of`],
    /// generic parameters are qualified by their owner (`List<Box.T>`), so
    /// a parameter never collides with a class-like of the same name.
    #[must_use]
    pub fn cache_key_of(&self, r#type: &Type) -> String {
        match r#type {
            Type::Array(array) => format!(
                "{}{}",
                self.cache_key_of(&array.element),
                "[]".repeat(array.dimension)
            ),
            Type::ClassLike(id) => {
                let Some((class_like, specialization)) = self
                    .class_like(*id)
                    .and_then(|x| x.specialization.as_ref().map(|y| (x, y)))
                else {
                    return self.signature_of(r#type);
                };

                format!(
                    "{}<{}>",
                    class_like.identifier,
                    specialization
                        .arguments
                        .iter()
                        .map(|x| self.cache_key_of(x))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Type::Parameter(id) => {
                self.generic_parameter(*id).map_or_else(String::new, |x| {
                    let owner = self
                        .class_like(x.owner)
                        .map_or("", |x| x.identifier.as_str());

                    format!("{owner}.{}", x.identifier)
                })
            }
            Type::Primitive(_) => self.signature_of(r#type),
        }
    }

    /// Returns `true` if a generic parameter occurs anywhere in the type.
    #[must_use]
    pub fn contains_unresolved_parameters(&self, r#type: &Type) -> bool {
        self.first_unresolved_parameter(r#type).is_some()
    }

    /// The first generic parameter occurring in the type, depth first.
    #[must_use]
    pub fn first_unresolved_parameter(
        &self,
        r#type: &Type,
    ) -> Option<ID<GenericParameter>> {
        match r#type {
            Type::Primitive(_) => None,
            Type::Array(array) => self.first_unresolved_parameter(&array.element),
            Type::ClassLike(id) => self
                .class_like(*id)
                .and_then(|x| x.specialization.as_ref())
                .and_then(|x| {
                    x.arguments
                        .iter()
                        .find_map(|x| self.first_unresolved_parameter(x))
                }),
            Type::Parameter(id) => Some(*id),
        }
    }

    /// How deeply instantiations are nested inside the type.
    #[must_use]
    pub fn specialization_depth(&self, r#type: &Type) -> usize {
        match r#type {
            Type::Array(array) => self.specialization_depth(&array.element),
            Type::ClassLike(id) => self
                .class_like(*id)
                .and_then(|x| x.specialization.as_ref())
                .map_or(0, |x| x.depth),
            Type::Primitive(_) | Type::Parameter(_) => 0,
        }
    }

    /// The direct supertypes of a class-like.
    ///
    /// A specialisation that isn't materialised yet answers with the
    /// supertypes of its base.
    #[must_use]
    pub fn direct_supertypes(&self, id: ID<ClassLike>) -> Vec<ID<ClassLike>> {
        self.hierarchy_source(id)
            .and_then(|x| self.class_like(x))
            .map(ClassLike::supertypes)
            .unwrap_or_default()
    }

    /// The superclass of a class, see [`Self::direct_supertypes`].
    #[must_use]
    pub fn superclass_of(&self, id: ID<ClassLike>) -> Option<ID<ClassLike>> {
        self.hierarchy_source(id)
            .and_then(|x| self.class_like(x))
            .and_then(ClassLike::superclass)
    }

    fn hierarchy_source(&self, id: ID<ClassLike>) -> Option<ID<ClassLike>> {
        let class_like = self.class_like(id)?;

        Some(match &class_like.specialization {
            Some(specialization) if !specialization.is_materialized => {
                specialization.base
            }
            _ => id,
        })
    }

    /// Checks whether `source` is `target` or one of its transitive
    /// subtypes. Every class-like is a subtype of `Object`, and a
    /// specialisation is a subtype of its raw base.
    #[must_use]
    pub fn is_subtype(
        &self,
        source: ID<ClassLike>,
        target: ID<ClassLike>,
    ) -> bool {
        if self.is_object(target) {
            return self.class_like(source).is_some();
        }

        let mut visited = HashSet::new();
        let mut stack = vec![source];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            if current == target || self.base_of(current) == target {
                return true;
            }

            stack.extend(self.direct_supertypes(current));
        }

        false
    }

    /// Checks whether a value of type `source` can be assigned to or cast to
    /// `target` without an explicit narrowing conversion.
    #[must_use]
    pub fn can_cast_to(&self, source: &Type, target: &Type) -> bool {
        if source == target {
            return true;
        }

        match (source, target) {
            (Type::Primitive(Primitive::Null), target) => {
                !target.is_value_primitive()
            }

            (Type::Primitive(source), Type::Primitive(target)) => {
                source.widens_to(*target)
            }

            (Type::Primitive(source), Type::ClassLike(target)) => source
                .boxed_identifier()
                .and_then(|x| self.get_by_identifier(x))
                .is_some_and(|boxed| self.is_subtype(boxed, *target)),

            (Type::ClassLike(source), Type::Primitive(target)) => self
                .class_like(self.base_of(*source))
                .and_then(|x| Primitive::from_boxed_identifier(&x.identifier))
                .is_some_and(|unboxed| unboxed.widens_to(*target)),

            (Type::ClassLike(source), Type::ClassLike(target)) => {
                self.is_subtype(*source, *target)
            }

            (Type::Array(_) | Type::Parameter(_), Type::ClassLike(target))
                if self.is_object(*target) =>
            {
                true
            }

            (Type::Array(source), Type::Array(target)) => {
                source.dimension == target.dimension
                    && if source.element.is_value_primitive()
                        || target.element.is_value_primitive()
                    {
                        source.element == target.element
                    } else {
                        self.can_cast_to(&source.element, &target.element)
                    }
            }

            (Type::Parameter(parameter), target) => {
                self.generic_parameter(*parameter).is_some_and(|x| {
                    x.extends.iter().any(|bound| self.can_cast_to(bound, target))
                })
            }

            _ => false,
        }
    }

    /// Checks whether `method` implements (overrides) `overridden`.
    ///
    /// Identifiers must match. Primitive return and parameter types must be
    /// identical; reference return types are covariant and reference
    /// parameter types must convert from the overridden parameter type.
    #[must_use]
    pub fn implements(
        &self,
        method: &MethodInfo,
        overridden: &MethodInfo,
    ) -> bool {
        if method.identifier != overridden.identifier {
            return false;
        }

        let returns_nothing =
            |x: &MethodInfo| x.return_type.as_ref().is_none_or(Type::is_void);

        if returns_nothing(method) {
            if !returns_nothing(overridden) {
                return false;
            }
        } else {
            let (Some(returned), Some(expected)) =
                (&method.return_type, &overridden.return_type)
            else {
                return false;
            };

            let compatible = if expected.is_value_primitive() {
                returned == expected
            } else {
                self.can_cast_to(returned, expected)
            };

            if !compatible {
                return false;
            }
        }

        method.parameters.len() == overridden.parameters.len()
            && method.parameters.iter().zip(&overridden.parameters).all(
                |(mine, theirs)| {
                    if theirs.r#type.is_value_primitive() {
                        theirs.r#type == mine.r#type
                    } else {
                        self.can_cast_to(&theirs.r#type, &mine.r#type)
                    }
                },
            )
    }

    /// The class-likes whose members a class-like sees: itself, its
    /// superclass chain, then every transitively reachable interface.
    /// `Object` is always included, last if nothing reaches it earlier.
    #[must_use]
    pub fn lookup_order(&self, id: ID<ClassLike>) -> Vec<ID<ClassLike>> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();

        let mut current = Some(id);
        while let Some(class_like) = current {
            if !visited.insert(class_like) {
                break;
            }

            order.push(class_like);
            current = self.superclass_of(class_like);
        }

        let mut queue = order
            .iter()
            .flat_map(|x| {
                let superclass = self.superclass_of(*x);
                self.direct_supertypes(*x)
                    .into_iter()
                    .filter(move |y| Some(*y) != superclass)
            })
            .collect::<VecDeque<_>>();

        while let Some(interface) = queue.pop_front() {
            if !visited.insert(interface) {
                continue;
            }

            order.push(interface);
            queue.extend(self.direct_supertypes(interface));
        }

        // interfaces and enums reach `Object` only implicitly
        if let Some(object) = self.get_by_identifier(OBJECT) {
            if visited.insert(object) {
                order.push(object);
            }
        }

        order
    }

    /// The methods visible on a class-like: its own methods followed by
    /// inherited methods whose signature isn't declared earlier in
    /// [`Self::lookup_order`]. Each method is paired with its declarer.
    #[must_use]
    pub fn effective_methods(
        &self,
        id: ID<ClassLike>,
    ) -> Vec<(ID<ClassLike>, &MethodInfo)> {
        let mut signatures = HashSet::new();
        let mut methods = Vec::new();

        for declarer in self.lookup_order(id) {
            let Some(class_like) = self.class_like(declarer) else {
                continue;
            };

            for method in &class_like.methods {
                if signatures.insert(method.signature.as_str()) {
                    methods.push((declarer, method));
                }
            }
        }

        methods
    }

    /// Reads the initial value of a static attribute.
    #[must_use]
    pub fn static_value(
        &self,
        id: ID<ClassLike>,
        identifier: &str,
    ) -> Option<&Value> {
        let class_like = self.class_like(id)?;
        let attribute =
            class_like.attribute(identifier).filter(|x| x.is_static)?;

        class_like.layout.static_values.get(attribute.index)
    }

    /// Creates an object whose attribute slots hold the initial values of
    /// the class.
    ///
    /// # Errors
    ///
    /// Only concrete classes are instantiable, see [`InstantiateError`].
    pub fn instantiate(
        &self,
        id: ID<ClassLike>,
    ) -> Result<ObjectRef, InstantiateError> {
        let class_like =
            self.class_like(id).ok_or(InstantiateError::UnknownClassLike)?;
        let identifier = class_like.identifier.clone();

        match &class_like.kind {
            Kind::Class(class) if class.is_abstract => {
                Err(InstantiateError::Abstract(identifier))
            }
            Kind::Class(_) => {
                log::trace!("instantiating `{}`", class_like.signature());

                Ok(Object::new_ref(
                    identifier,
                    class_like.layout.initial_values.clone(),
                ))
            }
            Kind::Interface(_) => Err(InstantiateError::Interface(identifier)),
            Kind::Enum(_) => Err(InstantiateError::Enum(identifier)),
        }
    }

    /// Invokes the method with the given signature visible on the
    /// class-like.
    ///
    /// The frame's first attribute index is set to the one of the class-like
    /// declaring the method.
    ///
    /// # Errors
    ///
    /// See [`InvokeError`].
    pub fn invoke(
        &self,
        id: ID<ClassLike>,
        signature: &str,
        mut frame: Frame,
    ) -> Result<Invocation, InvokeError> {
        if self.class_like(id).is_none() {
            return Err(InvokeError::UnknownClassLike);
        }

        let (declarer, method) = self
            .effective_methods(id)
            .into_iter()
            .find(|(_, x)| x.signature == signature)
            .ok_or_else(|| InvokeError::MethodNotFound(signature.to_owned()))?;

        frame.first_attribute_index = self
            .class_like(declarer)
            .map_or(0, |x| x.layout.first_attribute_index);

        match &method.body {
            Some(Executable::Native(function)) => {
                Ok(Invocation::Returned(function(&mut frame)?))
            }
            Some(Executable::Expression(expression)) => {
                Ok(Invocation::ExpressionBody(expression.clone()))
            }
            None => Err(InvokeError::NoBody(signature.to_owned())),
        }
    }
}

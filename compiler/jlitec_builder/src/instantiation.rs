//! Creates specialisations of generic class-likes and substitutes their
//! members once every declaration is compiled.
//!
//! An instantiation is identified by its canonical signature such as
//! `HashMap<String, List<Integer>>`, with generic parameters qualified by
//! their owner (`List<Bag.E>`) in cache keys. Closed instantiations live in
//! the global cache of the library. Instantiations that still mention generic
//! parameters are cached by the class-like declaring the first such
//! parameter, so `List<T>` of one class never aliases `List<T>` of another.
//!
//! A new specialisation starts as a shallow shell: its hierarchy queries
//! answer with the base until it's materialised, which happens after the
//! members of every declaration are known.

use std::collections::HashMap;

use itertools::Itertools;
use jlitec_arena::ID;
use jlitec_term::{
    class_like::{ClassLike, GenericParameter, Kind, Specialization},
    r#type::Type,
};

use crate::{
    compiler::Compiler,
    diagnostic::{MismatchedGenericArgumentCount, SpecializationDepthExceeded},
    Error,
};

type Substitution = HashMap<ID<GenericParameter>, Type>;

impl Compiler<'_> {
    /// Resolves `base<arguments>` through the caches, creating the
    /// specialisation on a miss.
    ///
    /// `context` is the class-like whose signatures are being compiled; its
    /// local cache is consulted after the global one.
    pub(crate) fn instantiate(
        &mut self,
        base: ID<ClassLike>,
        mut arguments: Vec<Type>,
        context: Option<ID<ClassLike>>,
        signature: &str,
    ) -> Result<Type, Error> {
        let base_class_like = self.class_like(base)?;
        let expected = base_class_like.generic_parameters.len();
        let identifier = base_class_like.identifier.clone();

        if arguments.len() != expected {
            self.report(MismatchedGenericArgumentCount {
                signature: signature.to_owned(),
                class_like: base,
                expected,
                found: arguments.len(),
                strict: self.options.strict,
            });

            let object = self.object_type();
            arguments.resize(expected, object);
        }

        if arguments.is_empty() {
            return Ok(Type::ClassLike(base));
        }

        let canonical = format!(
            "{identifier}<{}>",
            arguments.iter().map(|x| self.library.signature_of(x)).join(", ")
        );
        let key = format!(
            "{identifier}<{}>",
            arguments.iter().map(|x| self.library.cache_key_of(x)).join(", ")
        );

        if let Some(id) = self.library.cached(&key) {
            log::trace!("global cache hit for `{canonical}`");
            return Ok(Type::ClassLike(id));
        }

        if let Some(id) = context
            .and_then(|x| self.library.class_like(x))
            .and_then(|x| x.local_cache.get(&key))
        {
            log::trace!("local cache hit for `{canonical}`");
            return Ok(Type::ClassLike(*id));
        }

        let depth = 1 + arguments
            .iter()
            .map(|x| self.library.specialization_depth(x))
            .max()
            .unwrap_or(0);

        if depth > self.options.max_specialization_depth {
            self.report(SpecializationDepthExceeded {
                signature: canonical,
                maximum: self.options.max_specialization_depth,
            });
            return Ok(Type::ClassLike(base));
        }

        let is_open =
            arguments.iter().any(|x| self.library.contains_unresolved_parameters(x));

        if is_open && context.is_none() {
            return Err(Error::MissingGenericContext { signature: canonical });
        }

        let shell = self.specialization_shell(
            base,
            Specialization {
                base,
                arguments,
                signature: canonical.clone(),
                depth,
                is_materialized: false,
            },
        )?;
        let id = self.library.insert_specialization(shell);

        match context {
            Some(context) if is_open => {
                self.class_like_mut(context)?.local_cache.insert(key, id);
            }
            _ => self.library.cache(key, id),
        }

        log::trace!("created specialisation `{canonical}`");
        self.pending.push(id);

        Ok(Type::ClassLike(id))
    }

    /// A copy of the base without members, supertypes or generic
    /// parameters.
    fn specialization_shell(
        &self,
        base: ID<ClassLike>,
        specialization: Specialization,
    ) -> Result<ClassLike, Error> {
        let base = self.class_like(base)?;

        let mut kind = base.kind.clone();
        match &mut kind {
            Kind::Class(class) => {
                class.superclass = None;
                class.interfaces.clear();
            }
            Kind::Interface(interface) => interface.extended.clear(),
            Kind::Enum(enumeration) => enumeration.interfaces.clear(),
        }

        let mut shell =
            ClassLike::new(base.identifier.clone(), base.visibility, kind);
        shell.is_final = base.is_final;
        shell.prototype.clone_from(&base.prototype);
        shell.specialization = Some(specialization);

        Ok(shell)
    }

    /// Materialises every pending specialisation, including the ones
    /// created while materialising.
    pub(crate) fn materialize_pending(&mut self) -> Result<(), Error> {
        log::debug!("materialising {} specialisation(s)", self.pending.len());

        let mut index = 0;
        while let Some(id) = self.pending.get(index).copied() {
            index += 1;
            self.materialize(id)?;
        }

        self.pending.clear();

        Ok(())
    }

    /// Copies the hierarchy, members and layout of the base with the
    /// generic parameters replaced by the arguments.
    fn materialize(&mut self, id: ID<ClassLike>) -> Result<(), Error> {
        let Some(specialization) = self.class_like(id)?.specialization.clone()
        else {
            return Ok(());
        };

        let base = self.class_like(specialization.base)?.clone();
        let substitution = base
            .generic_parameters
            .iter()
            .copied()
            .zip(specialization.arguments.iter().cloned())
            .collect::<Substitution>();

        let mut kind = base.kind;
        match &mut kind {
            Kind::Class(class) => {
                class.superclass = class
                    .superclass
                    .map(|x| self.substitute_class_like(x, &substitution))
                    .transpose()?;
                class.interfaces =
                    self.substitute_class_likes(&class.interfaces, &substitution)?;
            }
            Kind::Interface(interface) => {
                interface.extended =
                    self.substitute_class_likes(&interface.extended, &substitution)?;
            }
            Kind::Enum(_) => {}
        }

        let mut methods = base.methods;
        for method in &mut methods {
            if let Some(return_type) = &method.return_type {
                method.return_type =
                    Some(self.substitute(return_type, &substitution)?);
            }

            for parameter in &mut method.parameters {
                parameter.r#type =
                    self.substitute(&parameter.r#type, &substitution)?;
            }

            method.signature = self.method_signature(
                &method.identifier,
                &method.parameters,
            );
        }

        let mut attributes = base.attributes;
        for attribute in &mut attributes {
            attribute.r#type = self.substitute(&attribute.r#type, &substitution)?;
        }

        let class_like = self.class_like_mut(id)?;
        class_like.kind = kind;
        class_like.methods = methods;
        class_like.attributes = attributes;
        class_like.layout = base.layout;
        if let Some(specialization) = &mut class_like.specialization {
            specialization.is_materialized = true;
        }

        log::trace!("materialised `{}`", specialization.signature);

        Ok(())
    }

    fn substitute_class_likes(
        &mut self,
        class_likes: &[ID<ClassLike>],
        substitution: &Substitution,
    ) -> Result<Vec<ID<ClassLike>>, Error> {
        class_likes
            .iter()
            .map(|x| self.substitute_class_like(*x, substitution))
            .collect()
    }

    fn substitute_class_like(
        &mut self,
        id: ID<ClassLike>,
        substitution: &Substitution,
    ) -> Result<ID<ClassLike>, Error> {
        Ok(self
            .substitute(&Type::ClassLike(id), substitution)?
            .into_class_like()
            .unwrap_or(id))
    }

    /// Replaces the generic parameters of `r#type`; nested instantiations
    /// are re-requested through the caches.
    pub(crate) fn substitute(
        &mut self,
        r#type: &Type,
        substitution: &Substitution,
    ) -> Result<Type, Error> {
        match r#type {
            Type::Primitive(_) => Ok(r#type.clone()),

            Type::Parameter(parameter) => {
                Ok(substitution.get(parameter).cloned().unwrap_or_else(|| r#type.clone()))
            }

            Type::Array(array) => Ok(Type::array(
                self.substitute(&array.element, substitution)?,
                array.dimension,
            )),

            Type::ClassLike(id) => {
                let Some(specialization) =
                    self.class_like(*id)?.specialization.clone()
                else {
                    return Ok(r#type.clone());
                };

                let arguments = specialization
                    .arguments
                    .iter()
                    .map(|x| self.substitute(x, substitution))
                    .collect::<Result<Vec<_>, _>>()?;

                if arguments == specialization.arguments {
                    return Ok(r#type.clone());
                }

                let context = arguments
                    .iter()
                    .find_map(|x| self.library.first_unresolved_parameter(x))
                    .and_then(|x| self.library.generic_parameter(x))
                    .map(|x| x.owner);

                self.instantiate(
                    specialization.base,
                    arguments,
                    context,
                    &specialization.signature,
                )
            }
        }
    }
}

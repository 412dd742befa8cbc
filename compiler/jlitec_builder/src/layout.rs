//! Computes the runtime storage layout of the declared class-likes and marks
//! the methods that are implemented by a subtype as virtual.

use std::collections::HashSet;

use jlitec_arena::ID;
use jlitec_term::class_like::{ClassLike, Layout};

use crate::{compiler::Compiler, diagnostic::UnknownStaticValue, Error};

impl Compiler<'_> {
    pub(crate) fn compute_layouts(&mut self) -> Result<(), Error> {
        log::debug!("computing layouts");

        let mut visited = HashSet::new();
        for id in self.library.types().clone() {
            self.compute_layout(id, &mut visited)?;
        }

        Ok(())
    }

    /// The superclass is laid out first so the own instance attributes
    /// start where the inherited ones end. Static attributes are numbered
    /// separately.
    fn compute_layout(
        &mut self,
        id: ID<ClassLike>,
        visited: &mut HashSet<ID<ClassLike>>,
    ) -> Result<(), Error> {
        if !visited.insert(id) {
            return Ok(());
        }

        let superclass = self
            .class_like(id)?
            .superclass()
            .map(|x| self.library.base_of(x));

        let (first_attribute_index, mut initial_values) = match superclass {
            Some(superclass) => {
                self.compute_layout(superclass, visited)?;
                let superclass = self.class_like(superclass)?;

                (
                    superclass.attribute_count(),
                    superclass.layout.initial_values.clone(),
                )
            }
            None => (0, Vec::new()),
        };

        let class_like = self.class_like_mut(id)?;
        let mut static_values = Vec::new();
        let mut next_index = first_attribute_index;

        for attribute in &mut class_like.attributes {
            if attribute.is_static {
                attribute.index = static_values.len();
                static_values.push(attribute.r#type.default_value());
            } else {
                attribute.index = next_index;
                next_index += 1;
                initial_values.push(attribute.r#type.default_value());
            }
        }

        class_like.layout =
            Layout { first_attribute_index, initial_values, static_values };

        let supplied = class_like
            .prototype
            .as_ref()
            .map(|x| x.static_values())
            .unwrap_or_default();

        for (identifier, value) in supplied {
            let class_like = self.class_like_mut(id)?;
            let index = class_like
                .attribute(&identifier)
                .filter(|x| x.is_static)
                .map(|x| x.index);

            match index.and_then(|x| class_like.layout.static_values.get_mut(x))
            {
                Some(slot) => *slot = value,
                None => {
                    self.report(UnknownStaticValue { class_like: id, identifier });
                }
            }
        }

        log::trace!(
            "laid out `{}` from slot {first_attribute_index}",
            self.class_like(id)?.identifier
        );

        Ok(())
    }

    /// Marks every method of a supertype as virtual when a method declared
    /// further down the lookup order implements it. Specialisations share
    /// the flags of their base.
    pub(crate) fn flag_virtual_methods(&mut self) -> Result<(), Error> {
        let mut flagged = HashSet::new();

        for id in self.library.types().clone() {
            let class_like = self.class_like(id)?;

            for method in &class_like.methods {
                if method.is_static || method.is_constructor() {
                    continue;
                }

                for supertype in self.library.lookup_order(id).into_iter().skip(1) {
                    let Some(overridden) = self.library.class_like(supertype) else {
                        continue;
                    };

                    for (index, candidate) in overridden.methods.iter().enumerate() {
                        if !candidate.is_static
                            && !candidate.is_constructor()
                            && self.library.implements(method, candidate)
                        {
                            flagged.insert((supertype, index));
                            flagged.insert((self.library.base_of(supertype), index));
                        }
                    }
                }
            }
        }

        for (id, index) in flagged {
            if let Some(method) = self.class_like_mut(id)?.methods.get_mut(index) {
                method.is_virtual = true;
            }
        }

        let specializations = self
            .library
            .class_likes()
            .filter_map(|(id, x)| x.specialization.as_ref().map(|x| (id, x.base)))
            .collect::<Vec<_>>();

        for (id, base) in specializations {
            let flags = self
                .class_like(base)?
                .methods
                .iter()
                .map(|x| x.is_virtual)
                .collect::<Vec<_>>();

            for (method, is_virtual) in
                self.class_like_mut(id)?.methods.iter_mut().zip(flags)
            {
                method.is_virtual |= is_virtual;
            }
        }

        Ok(())
    }
}

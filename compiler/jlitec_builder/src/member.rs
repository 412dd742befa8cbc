//! Compiles attribute and method signatures and links the native bodies.

use itertools::Itertools;
use jlitec_arena::ID;
use jlitec_reflection::Executable;
use jlitec_term::{
    class_like::{ClassLike, EnumConstant, Kind},
    member::{AttributeInfo, MethodInfo, Parameter},
};

use crate::{
    compiler::Compiler,
    diagnostic::{MisplacedEllipsis, RedefinedMember},
    Error,
};

impl Compiler<'_> {
    /// Compiles every attribute and method declared by the native class of
    /// a class-like, and records the constants of enums.
    pub(crate) fn compile_members(
        &mut self,
        id: ID<ClassLike>,
    ) -> Result<(), Error> {
        let Some(prototype) = self.class_like(id)?.prototype.clone() else {
            return Ok(());
        };

        for signature in prototype.attributes() {
            let Some(attribute) = self.compile_attribute(&signature, id)? else {
                continue;
            };

            if self.class_like(id)?.attribute(&attribute.identifier).is_some() {
                self.report(RedefinedMember {
                    class_like: id,
                    member: attribute.identifier,
                });
                continue;
            }

            self.class_like_mut(id)?.attributes.push(attribute);
        }

        for (signature, body) in prototype.methods() {
            let method = self.compile_method(&signature, body, id)?;

            if self.class_like(id)?.method(&method.signature).is_some() {
                self.report(RedefinedMember {
                    class_like: id,
                    member: method.signature,
                });
                continue;
            }

            self.class_like_mut(id)?.methods.push(method);
        }

        if let Kind::Enum(enumeration) = &mut self.class_like_mut(id)?.kind {
            enumeration.constants = prototype
                .enum_constants()
                .into_iter()
                .enumerate()
                .map(|(ordinal, identifier)| EnumConstant { identifier, ordinal })
                .collect();
        }

        Ok(())
    }

    /// `modifiers type identifier`
    ///
    /// Returns [`None`] if the identifier is missing.
    pub(crate) fn compile_attribute(
        &mut self,
        signature: &str,
        owner: ID<ClassLike>,
    ) -> Result<Option<AttributeInfo>, Error> {
        let mut parser = self.parser(signature);
        let modifiers = parser.parse_modifiers();
        let r#type = self.parse_type(&mut parser, Some(owner))?;

        let Some(identifier) = self.expect_identifier(&mut parser) else {
            return Ok(None);
        };
        self.expect_end(&parser, "the end of the attribute");

        Ok(Some(AttributeInfo {
            identifier,
            r#type,
            visibility: modifiers.visibility,
            is_static: modifiers.is_static,
            is_final: modifiers.is_final,
            is_transient: modifiers.is_transient,
            index: 0,
        }))
    }

    /// `modifiers [type] identifier(type identifier, ...)`
    ///
    /// A method without a return type is a constructor.
    pub(crate) fn compile_method(
        &mut self,
        signature: &str,
        body: Executable,
        owner: ID<ClassLike>,
    ) -> Result<MethodInfo, Error> {
        let mut parser = self.parser(signature);
        let modifiers = parser.parse_modifiers();

        let is_constructor = parser.peek_identifier().is_some()
            && parser.peek_nth(1).is_some_and(|x| x.is_punctuation_char('('));

        let return_type = if is_constructor {
            None
        } else {
            Some(self.parse_type(&mut parser, Some(owner))?)
        };
        let identifier = self.expect_identifier(&mut parser).unwrap_or_default();

        let mut parameters = Vec::<Parameter>::new();
        if self.expect_punctuation(&mut parser, '(') {
            while parser.peek_identifier().is_some() {
                let r#type = self.parse_type(&mut parser, Some(owner))?;
                let is_ellipsis = parser.eat_ellipsis();
                let identifier =
                    self.expect_identifier(&mut parser).unwrap_or_default();

                parameters.push(Parameter {
                    identifier,
                    r#type,
                    is_ellipsis,
                    // slot 0 holds the receiver
                    stack_position: parameters.len() + 1,
                });

                if !parser.eat_punctuation(',') {
                    break;
                }
            }

            self.expect_punctuation(&mut parser, ')');
        }
        self.expect_end(&parser, "the end of the method");

        let last = parameters.len().saturating_sub(1);
        for parameter in &mut parameters[..last] {
            if parameter.is_ellipsis {
                self.report(MisplacedEllipsis {
                    signature: signature.to_owned(),
                    parameter: parameter.identifier.clone(),
                });
                parameter.is_ellipsis = false;
            }
        }

        let method_signature = self.method_signature(&identifier, &parameters);

        Ok(MethodInfo {
            identifier,
            return_type,
            parameters,
            visibility: modifiers.visibility,
            is_abstract: modifiers.is_abstract,
            is_static: modifiers.is_static,
            is_final: modifiers.is_final,
            is_virtual: false,
            signature: method_signature,
            body: Some(body),
        })
    }

    /// `identifier(type,type...)`, e.g. `format(String,Object...)`.
    pub(crate) fn method_signature(
        &self,
        identifier: &str,
        parameters: &[Parameter],
    ) -> String {
        format!(
            "{identifier}({})",
            parameters
                .iter()
                .map(|x| {
                    let name = self.library.signature_of(&x.r#type);
                    if x.is_ellipsis {
                        format!("{name}...")
                    } else {
                        name
                    }
                })
                .join(",")
        )
    }
}

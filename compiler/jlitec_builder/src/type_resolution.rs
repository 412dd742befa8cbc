//! Resolves type references inside signatures.

use std::str::FromStr;

use jlitec_arena::ID;
use jlitec_lexical::token::Token;
use jlitec_term::{
    class_like::{ClassLike, GenericParameter},
    library::OBJECT,
    r#type::{Primitive, Type},
};

use crate::{
    compiler::Compiler,
    diagnostic::{ExpectedType, UnknownType},
    parser::Parser,
    Error,
};

impl Compiler<'_> {
    /// Parses a type: a primitive, a generic parameter of `context`, or a
    /// class-like with optional type arguments, followed by any number of
    /// `[]` groups.
    ///
    /// A missing type is taken as `void` and an unknown identifier as
    /// `Object`; both are reported.
    pub(crate) fn parse_type(
        &mut self,
        parser: &mut Parser,
        context: Option<ID<ClassLike>>,
    ) -> Result<Type, Error> {
        let element = self.parse_element_type(parser, context)?;

        let mut dimension = 0;
        while parser.peek().is_some_and(|x| x.is_punctuation_char('['))
            && parser.peek_nth(1).is_some_and(|x| x.is_punctuation_char(']'))
        {
            parser.advance();
            parser.advance();
            dimension += 1;
        }

        Ok(Type::array(element, dimension))
    }

    fn parse_element_type(
        &mut self,
        parser: &mut Parser,
        context: Option<ID<ClassLike>>,
    ) -> Result<Type, Error> {
        let identifier = match parser.advance() {
            Some(Token::Identifier(identifier)) => identifier,
            found => {
                self.report(ExpectedType {
                    signature: parser.signature().to_owned(),
                    found: found.unwrap_or(Token::EndOfInput).to_string(),
                });
                return Ok(Type::VOID);
            }
        };

        if let Ok(primitive) = Primitive::from_str(&identifier) {
            return Ok(Type::Primitive(primitive));
        }

        if let Some(parameter) = self.generic_parameter_in(context, &identifier)
        {
            return Ok(Type::Parameter(parameter));
        }

        let Some(id) = self.library.get_by_identifier(&identifier) else {
            self.report(UnknownType {
                signature: parser.signature().to_owned(),
                identifier,
            });
            return Ok(self.object_type());
        };

        if self.class_like(id)?.kind.is_enum() || !parser.eat_punctuation('<')
        {
            return Ok(Type::ClassLike(id));
        }

        let mut arguments = Vec::new();
        while parser.peek_identifier().is_some() {
            arguments.push(self.parse_type(parser, context)?);

            if !parser.eat_punctuation(',') {
                break;
            }
        }
        self.expect_punctuation(parser, '>');

        self.instantiate(id, arguments, context, parser.signature())
    }

    /// Looks up a generic parameter declared by the context class or
    /// interface.
    fn generic_parameter_in(
        &self,
        context: Option<ID<ClassLike>>,
        identifier: &str,
    ) -> Option<ID<GenericParameter>> {
        let class_like = self.library.class_like(context?)?;

        if class_like.kind.is_enum() {
            return None;
        }

        class_like.generic_parameters.iter().copied().find(|x| {
            self.library
                .generic_parameter(*x)
                .is_some_and(|x| x.identifier == identifier)
        })
    }

    /// The fallback for unresolvable references.
    pub(crate) fn object_type(&self) -> Type {
        self.library.get_by_identifier(OBJECT).map_or(Type::VOID, Type::ClassLike)
    }
}

//! Creates the generic parameters of class and interface headers and
//! resolves their bounds.

use jlitec_arena::ID;
use jlitec_lexical::token::{Keyword, Token};
use jlitec_term::{
    class_like::{ClassLike, GenericParameter},
    r#type::Type,
};

use crate::{
    compiler::Compiler, diagnostic::ExpectedClassLike, parser::Parser, Error,
};

impl Compiler<'_> {
    /// Creates an unbounded placeholder for each top-level identifier of the
    /// `<...>` list. Bounds are skipped; they may name class-likes that
    /// aren't registered yet.
    pub(crate) fn create_generic_parameter_placeholders(
        &mut self,
        owner: ID<ClassLike>,
        parser: &mut Parser,
    ) {
        if !parser.eat_punctuation('<') {
            return;
        }

        let mut depth = 1usize;

        while depth == 1 {
            let Some(identifier) = parser.peek_identifier().map(str::to_owned)
            else {
                break;
            };
            parser.advance();

            let id = self
                .library
                .insert_generic_parameter(GenericParameter::new(identifier, owner));
            if let Some(class_like) = self.library.class_like_mut(owner) {
                class_like.generic_parameters.push(id);
            }

            // skip the bounds up to the next top-level `,` or the closing `>`
            while let Some(token) = parser.advance() {
                match token {
                    Token::Punctuation('<') => depth += 1,
                    Token::Punctuation('>') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    Token::Punctuation(',') if depth == 1 => break,
                    _ => {}
                }
            }
        }
    }

    /// Parses the `<...>` list again, now resolving `extends A & B` and
    /// `super T` bounds of each parameter.
    pub(crate) fn resolve_generic_parameter_bounds(
        &mut self,
        owner: ID<ClassLike>,
        parser: &mut Parser,
    ) -> Result<(), Error> {
        if !parser.eat_punctuation('<') {
            return Ok(());
        }

        let parameters = self.class_like(owner)?.generic_parameters.clone();
        let mut parameters = parameters.into_iter();

        while parser.peek_identifier().is_some() {
            parser.advance();
            let parameter = parameters.next();

            loop {
                if parser.eat_keyword(Keyword::Extends) {
                    loop {
                        let bound = self.parse_type(parser, Some(owner))?;

                        if let Some(bound) = self.checked_bound(parser, bound) {
                            if let Some(parameter) = parameter
                                .and_then(|x| self.library.generic_parameter_mut(x))
                            {
                                parameter.extends.push(bound);
                            }
                        }

                        if !parser.eat_punctuation('&') {
                            break;
                        }
                    }
                } else if parser.eat_keyword(Keyword::Super) {
                    let bound = self.parse_type(parser, Some(owner))?;

                    if let Some(bound) = self.checked_bound(parser, bound) {
                        if let Some(parameter) = parameter
                            .and_then(|x| self.library.generic_parameter_mut(x))
                        {
                            parameter.super_bound = Some(bound);
                        }
                    }
                } else {
                    break;
                }
            }

            if !parser.eat_punctuation(',') {
                break;
            }
        }

        self.expect_punctuation(parser, '>');

        Ok(())
    }

    /// Bounds must be class-likes or generic parameters.
    fn checked_bound(&self, parser: &Parser, bound: Type) -> Option<Type> {
        if matches!(bound, Type::ClassLike(_) | Type::Parameter(_)) {
            return Some(bound);
        }

        self.report(ExpectedClassLike {
            signature: parser.signature().to_owned(),
            found: self.library.signature_of(&bound),
        });

        None
    }
}

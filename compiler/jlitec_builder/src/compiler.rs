//! Drives the passes over all declarations.

use std::{collections::HashSet, sync::Arc};

use jlitec_arena::ID;
use jlitec_diagnostic::Severity;
use jlitec_handler::{Handler, Storage};
use jlitec_lexical::token::{Keyword, Token};
use jlitec_reflection::LibraryClass;
use jlitec_term::{
    class_like::{Class, ClassLike, Enum, Interface, Kind},
    library::{Library, OBJECT},
    r#type::Type,
};

use crate::{
    diagnostic::{
        CyclicInheritance, Diagnostic, ExpectedClassLike,
        ImplementsOnInterface, InvalidSupertype, Lexical, MultipleSuperclasses,
        RedefinedClassLike, SupertypeKind, UnexpectedToken,
        UnrecognizedDeclarationKeyword,
    },
    parser::Parser,
    Error, Options,
};

/// A registered declaration waiting for the later passes.
#[derive(Debug, Clone)]
struct Intake {
    id: ID<ClassLike>,

    /// The header tokens following the identifier: generic parameters and
    /// supertype clauses.
    header: Parser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Extends,
    Implements,
}

/// The mutable state of one compilation.
#[derive(Debug)]
pub(crate) struct Compiler<'a> {
    pub(crate) library: Library,
    pub(crate) options: &'a Options,

    /// Specialisations whose members and hierarchy still have to be
    /// substituted.
    pub(crate) pending: Vec<ID<ClassLike>>,

    diagnostics: Storage<Box<dyn Diagnostic>>,
    intakes: Vec<Intake>,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(options: &'a Options) -> Self {
        Self {
            library: Library::new(),
            options,
            pending: Vec::new(),
            diagnostics: Storage::new(),
            intakes: Vec::new(),
        }
    }

    pub(crate) fn run(
        &mut self,
        declarations: &[Arc<dyn LibraryClass>],
    ) -> Result<(), Error> {
        log::debug!("registering {} declaration(s)", declarations.len());
        for declaration in declarations {
            self.register_declaration(declaration);
        }

        log::debug!("resolving generic bounds and supertypes");
        let intakes = std::mem::take(&mut self.intakes);
        for intake in &intakes {
            self.resolve_hierarchy(intake)?;
        }
        self.break_inheritance_cycles()?;

        log::debug!("compiling members");
        for intake in &intakes {
            self.compile_members(intake.id)?;
        }

        self.compute_layouts()?;
        self.materialize_pending()?;
        self.flag_virtual_methods()?;

        log::debug!(
            "compiled {} class-like(s), {} cached instantiation(s)",
            self.library.types().len(),
            self.library.type_cache().len()
        );

        Ok(())
    }

    pub(crate) fn finish(self) -> (Library, Storage<Box<dyn Diagnostic>>) {
        (self.library, self.diagnostics)
    }

    pub(crate) fn report<D: Diagnostic>(&self, diagnostic: D) {
        let rendered = diagnostic.report(&self.library);

        match rendered.severity {
            Severity::Error | Severity::Warning => {
                log::warn!("{:?}: {}", rendered.severity, rendered.message);
            }
            Severity::Info => log::debug!("{}", rendered.message),
        }

        self.diagnostics.receive(diagnostic);
    }

    pub(crate) fn class_like(
        &self,
        id: ID<ClassLike>,
    ) -> Result<&ClassLike, Error> {
        self.library.class_like(id).ok_or(Error::InvalidClassLike(id))
    }

    pub(crate) fn class_like_mut(
        &mut self,
        id: ID<ClassLike>,
    ) -> Result<&mut ClassLike, Error> {
        self.library.class_like_mut(id).ok_or(Error::InvalidClassLike(id))
    }

    /// Tokenizes a signature, reporting lexical errors.
    pub(crate) fn parser(&self, signature: &str) -> Parser {
        let errors = Storage::<jlitec_lexical::error::Error>::new();
        let tokens = jlitec_lexical::tokenize(signature, &errors).significant();

        for error in errors.into_vec() {
            self.report(Lexical { signature: signature.to_owned(), error });
        }

        Parser::new(signature, tokens)
    }

    pub(crate) fn expect_punctuation(
        &self,
        parser: &mut Parser,
        punctuation: char,
    ) -> bool {
        if parser.eat_punctuation(punctuation) {
            return true;
        }

        self.report(UnexpectedToken {
            signature: parser.signature().to_owned(),
            expected: format!("`{punctuation}`"),
            found: parser.found(),
        });

        false
    }

    pub(crate) fn expect_identifier(
        &self,
        parser: &mut Parser,
    ) -> Option<String> {
        if parser.peek_identifier().is_some() {
            return parser.advance().and_then(|x| x.into_identifier().ok());
        }

        self.report(UnexpectedToken {
            signature: parser.signature().to_owned(),
            expected: "an identifier".to_owned(),
            found: parser.found(),
        });

        None
    }

    pub(crate) fn expect_end(&self, parser: &Parser, expected: &str) {
        if !parser.is_exhausted() {
            self.report(UnexpectedToken {
                signature: parser.signature().to_owned(),
                expected: expected.to_owned(),
                found: parser.found(),
            });
        }
    }

    /// Reads the modifiers, keyword and identifier of a header and
    /// registers an empty class-like for it.
    fn register_declaration(&mut self, declaration: &Arc<dyn LibraryClass>) {
        let signature = declaration.signature();
        let mut parser = self.parser(&signature);
        let modifiers = parser.parse_modifiers();

        let kind = match parser.advance() {
            Some(Token::Keyword(Keyword::Class)) => Kind::Class(Class {
                is_abstract: modifiers.is_abstract,
                ..Class::default()
            }),
            Some(Token::Keyword(Keyword::Interface)) => {
                Kind::Interface(Interface::default())
            }
            Some(Token::Keyword(Keyword::Enum)) => Kind::Enum(Enum::default()),
            found => {
                self.report(UnrecognizedDeclarationKeyword {
                    signature,
                    found: found.unwrap_or(Token::EndOfInput).to_string(),
                    strict: self.options.strict,
                });
                return;
            }
        };

        let Some(identifier) = self.expect_identifier(&mut parser) else {
            return;
        };

        let is_generic = !kind.is_enum();
        let mut class_like =
            ClassLike::new(identifier, modifiers.visibility, kind);
        class_like.is_final = modifiers.is_final;
        class_like.prototype = Some(declaration.clone());

        let id = match self.library.register(class_like) {
            Ok(id) => id,
            Err(existing) => {
                self.report(RedefinedClassLike { existing, signature });
                return;
            }
        };

        log::trace!("registered `{signature}`");

        let header = Parser::new(&signature, parser.remaining());
        if is_generic {
            self.create_generic_parameter_placeholders(id, &mut parser);
        }

        self.intakes.push(Intake { id, header });
    }

    /// Resolves the generic bounds and the supertype clauses of a header.
    /// Classes without a superclass extend `Object`.
    fn resolve_hierarchy(&mut self, intake: &Intake) -> Result<(), Error> {
        let id = intake.id;
        let mut parser = intake.header.clone();

        if !self.class_like(id)?.kind.is_enum() {
            self.resolve_generic_parameter_bounds(id, &mut parser)?;
        }

        loop {
            if parser.eat_keyword(Keyword::Extends) {
                self.supertype_list(id, &mut parser, Clause::Extends)?;
            } else if parser.eat_keyword(Keyword::Implements) {
                self.supertype_list(id, &mut parser, Clause::Implements)?;
            } else {
                break;
            }
        }

        self.expect_end(&parser, "`extends`, `implements` or the end");

        let object = self.library.get_by_identifier(OBJECT);
        let is_object = self.library.is_object(id);

        if let Kind::Class(class) = &mut self.class_like_mut(id)?.kind {
            if class.superclass.is_none() && !is_object {
                class.superclass = object;
            }
        }

        Ok(())
    }

    fn supertype_list(
        &mut self,
        id: ID<ClassLike>,
        parser: &mut Parser,
        clause: Clause,
    ) -> Result<(), Error> {
        let rejected = clause == Clause::Implements
            && self.class_like(id)?.kind.is_interface();

        if rejected {
            self.report(ImplementsOnInterface {
                signature: parser.signature().to_owned(),
            });
        }

        loop {
            let supertype = self.parse_type(parser, Some(id))?;

            if !rejected {
                self.add_supertype(id, &supertype, clause, parser.signature())?;
            }

            if !parser.eat_punctuation(',') {
                return Ok(());
            }
        }
    }

    fn add_supertype(
        &mut self,
        id: ID<ClassLike>,
        supertype: &Type,
        clause: Clause,
        signature: &str,
    ) -> Result<(), Error> {
        let Type::ClassLike(supertype) = *supertype else {
            self.report(ExpectedClassLike {
                signature: signature.to_owned(),
                found: self.library.signature_of(supertype),
            });
            return Ok(());
        };

        let supertype_kind =
            &self.class_like(self.library.base_of(supertype))?.kind;
        let expected = match (&self.class_like(id)?.kind, clause) {
            (Kind::Class(_), Clause::Extends) => SupertypeKind::Class,
            (Kind::Enum(_), Clause::Extends) => SupertypeKind::Nothing,
            _ => SupertypeKind::Interface,
        };
        let accepted = match expected {
            SupertypeKind::Class => supertype_kind.is_class(),
            SupertypeKind::Interface => supertype_kind.is_interface(),
            SupertypeKind::Nothing => false,
        };

        if !accepted {
            self.report(InvalidSupertype {
                signature: signature.to_owned(),
                supertype,
                expected,
            });
            return Ok(());
        }

        if clause == Clause::Extends {
            // the first superclass is kept
            if let Some(existing) = self.library.superclass_of(id) {
                self.report(MultipleSuperclasses {
                    signature: signature.to_owned(),
                    existing,
                    ignored: supertype,
                });
                return Ok(());
            }
        }

        match &mut self.class_like_mut(id)?.kind {
            Kind::Class(class) if clause == Clause::Extends => {
                class.superclass = Some(supertype);
            }
            Kind::Class(class) => class.interfaces.push(supertype),
            Kind::Interface(interface) => interface.extended.push(supertype),
            Kind::Enum(enumeration) => enumeration.interfaces.push(supertype),
        }

        Ok(())
    }

    /// Resets the superclass of every class whose superclass chain leads
    /// back to itself.
    fn break_inheritance_cycles(&mut self) -> Result<(), Error> {
        let object = self.library.get_by_identifier(OBJECT);

        for id in self.library.types().clone() {
            let mut visited = HashSet::from([id]);
            let mut current = self.library.superclass_of(id);
            let mut is_cyclic = false;

            while let Some(superclass) = current.map(|x| self.library.base_of(x))
            {
                if superclass == id {
                    is_cyclic = true;
                    break;
                }

                if !visited.insert(superclass) {
                    break;
                }

                current = self.library.superclass_of(superclass);
            }

            if is_cyclic {
                self.report(CyclicInheritance { class_like: id });

                if let Some(class) = self.class_like_mut(id)?.kind.as_class_mut()
                {
                    class.superclass = object.filter(|x| *x != id);
                }
            }
        }

        Ok(())
    }
}

//! Compiles native library classes into a [`Library`].
//!
//! Every [`LibraryClass`] describes itself with Java-like signature strings.
//! The builder reads them in three passes over all declarations:
//!
//! 1. every header is registered and generic parameters get placeholders,
//!    so forward references resolve regardless of declaration order;
//! 2. generic bounds and the `extends`/`implements` clauses are resolved;
//! 3. attributes and methods are compiled and linked to their native
//!    bodies.
//!
//! Layouts, the specialisations created along the way and the virtual flags
//! are computed once all three passes are through.

use std::sync::Arc;

use jlitec_diagnostic::Severity;
use jlitec_handler::Handler;
use jlitec_reflection::LibraryClass;
use jlitec_term::library::Library;
use serde::{Deserialize, Serialize};

use crate::{compiler::Compiler, diagnostic::Diagnostic};

pub mod diagnostic;

mod compiler;
mod generic_parameters;
mod instantiation;
mod layout;
mod member;
mod parser;
mod type_resolution;

/// Tunes how forgiving the compilation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Turns recoverable usage errors (mismatched generic argument counts,
    /// unknown declaration keywords) into errors that abort the
    /// compilation.
    pub strict: bool,

    /// The deepest nesting of instantiations the builder materialises. A
    /// deeper request falls back to the raw generic class-like.
    pub max_specialization_depth: usize,
}

impl Default for Options {
    fn default() -> Self { Self { strict: false, max_specialization_depth: 8 } }
}

/// The compilation couldn't produce a library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// At least one error was reported under [`Options::strict`].
    #[error("compilation aborted: {0} error(s) reported in strict mode")]
    Aborted(usize),

    /// An instantiation still mentions generic parameters but there's no
    /// class-like whose local cache could hold it.
    #[error(
        "instantiation `{signature}` refers to generic parameters outside of \
         any generic context"
    )]
    MissingGenericContext {
        /// The canonical signature of the instantiation.
        signature: String,
    },

    /// A class-like ID escaped the library it belongs to.
    #[error("class-like `{0:?}` is not part of the library")]
    InvalidClassLike(jlitec_arena::ID<jlitec_term::class_like::ClassLike>),
}

/// Compiles the prelude followed by the given declarations.
///
/// Diagnostics are reported to the `handler` once the compilation is
/// complete. A library with structural errors is still returned unless
/// [`Options::strict`] is set.
///
/// # Errors
///
/// See [`Error`].
pub fn compile(
    declarations: &[Arc<dyn LibraryClass>],
    options: &Options,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) -> Result<Library, Error> {
    let declarations = jlitec_library::prelude()
        .into_iter()
        .chain(declarations.iter().cloned())
        .collect::<Vec<_>>();

    let mut compiler = Compiler::new(options);
    let result = compiler.run(&declarations);
    let (library, diagnostics) = compiler.finish();

    if let Err(error) = result {
        diagnostics.propagate::<Box<dyn Diagnostic>, _>(handler);
        return Err(error);
    }

    let errors = diagnostics
        .count(|x| x.report(&library).severity == Severity::Error);

    diagnostics.propagate::<Box<dyn Diagnostic>, _>(handler);

    if options.strict && errors > 0 {
        log::warn!("aborting, {errors} error(s) reported in strict mode");
        return Err(Error::Aborted(errors));
    }

    Ok(library)
}

#[cfg(test)]
mod test;

//! The natively implemented classes every jlite program can use.
//!
//! The [`prelude`] holds the bootstrap classes: `Object`, `String` and the
//! boxed wrappers of the primitives. The compiler always compiles it first.
//! The [`exceptions`] are the standard throwable hierarchy.

use std::sync::Arc;

use jlitec_reflection::LibraryClass;

pub mod exceptions;
pub mod prelude;

/// The bootstrap classes in dependency order.
#[must_use]
pub fn prelude() -> Vec<Arc<dyn LibraryClass>> {
    vec![
        Arc::new(prelude::ObjectClass),
        Arc::new(prelude::StringClass),
        Arc::new(prelude::IntegerClass),
        Arc::new(prelude::LongClass),
        Arc::new(prelude::FloatClass),
        Arc::new(prelude::DoubleClass),
        Arc::new(prelude::BooleanClass),
        Arc::new(prelude::CharacterClass),
    ]
}

/// The standard exception hierarchy.
#[must_use]
pub fn exceptions() -> Vec<Arc<dyn LibraryClass>> {
    vec![
        Arc::new(exceptions::Throwable),
        Arc::new(exceptions::Exception),
        Arc::new(exceptions::ArithmeticException),
        Arc::new(exceptions::ClassCastException),
        Arc::new(exceptions::IndexOutOfBoundsException),
    ]
}

/// Every library class shipped on top of the prelude.
#[must_use]
pub fn standard_library() -> Vec<Arc<dyn LibraryClass>> { exceptions() }

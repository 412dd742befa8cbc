//! Contains the [`Handler`] trait, the diagnostics collector threaded through
//! every compilation routine.
//!
//! Routines that run into a recoverable problem report it to the handler and
//! carry on with a sentinel value instead of aborting. The builder collects
//! into a [`Storage`] of its own so it can count errors for strict mode before
//! handing everything over to the caller's handler.

use std::fmt::Debug;

use parking_lot::{RwLock, RwLockReadGuard};

/// Receives the diagnostics of a compilation.
pub trait Handler<T>: Send + Sync {
    /// Receives a diagnostic and handles it.
    fn receive(&self, diagnostic: T);
}

/// A [`Handler`] that keeps every diagnostic in reporting order.
#[derive(Debug)]
pub struct Storage<T: Send + Sync> {
    diagnostics: RwLock<Vec<T>>,
}

impl<T: Send + Sync> Storage<T> {
    /// Creates a new empty [`Storage`]
    #[must_use]
    pub const fn new() -> Self { Self { diagnostics: RwLock::new(Vec::new()) } }

    /// Consumes the [`Storage`] and returns the diagnostics.
    pub fn into_vec(self) -> Vec<T> { self.diagnostics.into_inner() }

    /// Returns the diagnostics received so far.
    pub fn as_vec(&self) -> RwLockReadGuard<Vec<T>> { self.diagnostics.read() }

    /// Counts the diagnostics matching the predicate, e.g. the ones of error
    /// severity.
    pub fn count(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.diagnostics.read().iter().filter(|x| predicate(x)).count()
    }

    /// Moves every diagnostic to the given handler, leaving the storage
    /// empty.
    pub fn propagate<U: From<T>, H: ?Sized + Handler<U>>(&self, handler: &H) {
        let diagnostics = std::mem::take(&mut *self.diagnostics.write());

        for diagnostic in diagnostics {
            handler.receive(diagnostic.into());
        }
    }
}

impl<T: Send + Sync> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + Sync, U> Handler<U> for Storage<T>
where
    U: Into<T>,
{
    fn receive(&self, diagnostic: U) {
        self.diagnostics.write().push(diagnostic.into());
    }
}

/// Panics on the first diagnostic, for compilations expected to be clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Panic;

impl<T: Debug> Handler<T> for Panic {
    fn receive(&self, diagnostic: T) {
        panic!("{diagnostic:?}");
    }
}

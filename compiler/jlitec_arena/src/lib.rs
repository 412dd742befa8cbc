//! Contains the definition of [`Arena`] and [`ID`].
//!
//! [`Arena`] stores items of type `T` and hands out a typed [`ID`] for each
//! of them. The IDs are stable: the arena never removes items, so an [`ID`]
//! given out while a node is still empty stays valid after the node has been
//! filled in. This is what allows class-likes and generic parameters to refer
//! to each other before their declarations are complete.

use std::{
    fmt::Debug,
    hash::Hash,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// Represents an unique identifier to a particular entry in the [`Arena`] of
/// type `T`.
pub struct ID<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    /// Creates a new [`ID`] with the given index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self { index, _marker: PhantomData }
    }

    /// Returns the raw index of the [`ID`].
    #[must_use]
    pub const fn index(self) -> usize { self.index }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let type_name = std::any::type_name::<T>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);

        f.debug_tuple(format!("ID<{short}>").as_str())
            .field(&self.index)
            .finish()
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for ID<T> {}

impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool { self.index == other.index }
}

impl<T> Eq for ID<T> {}

impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for ID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

/// Represents a collection of items of type `T` that can be referenced by an
/// [`ID`].
///
/// Internally, all the items are stored in a [`Vec`], and the [`ID`] is just
/// an index to the item in the [`Vec`]. Unlike [`Vec`], [`Arena`] doesn't
/// allow removing items since it would invalidate all the [`ID`]s given out
/// before.
#[derive(Clone, PartialEq, Eq)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T: Debug> Debug for Arena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self { Self { items: Vec::new() } }
}

impl<T> Arena<T> {
    /// Creates a new empty [`Arena`].
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the number of items in the [`Arena`].
    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    /// Returns `true` if the [`Arena`] contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Inserts a new item into the [`Arena`] and returns its [`ID`].
    pub fn insert(&mut self, item: T) -> ID<T> {
        let index = self.items.len();
        self.items.push(item);
        ID::new(index)
    }

    /// Inserts a new item built from its own future [`ID`].
    pub fn insert_with(&mut self, f: impl FnOnce(ID<T>) -> T) -> ID<T> {
        let id = ID::new(self.items.len());
        self.items.push(f(id));
        id
    }

    /// Returns a reference to the item with the given [`ID`].
    #[must_use]
    pub fn get(&self, id: ID<T>) -> Option<&T> { self.items.get(id.index) }

    /// Returns a mutable reference to the item with the given [`ID`].
    #[must_use]
    pub fn get_mut(&mut self, id: ID<T>) -> Option<&mut T> {
        self.items.get_mut(id.index)
    }

    /// Returns an iterator over the [`ID`]s and items in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ID<T>, &T)> {
        self.items.iter().enumerate().map(|(index, item)| (ID::new(index), item))
    }

    /// Returns an iterator over the [`ID`]s of the items in insertion order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = ID<T>> {
        (0..self.items.len()).map(ID::new)
    }
}

impl<T> Index<ID<T>> for Arena<T> {
    type Output = T;

    fn index(&self, id: ID<T>) -> &Self::Output {
        self.get(id).expect("ID handed out by a different arena")
    }
}

impl<T> IndexMut<ID<T>> for Arena<T> {
    fn index_mut(&mut self, id: ID<T>) -> &mut Self::Output {
        self.get_mut(id).expect("ID handed out by a different arena")
    }
}

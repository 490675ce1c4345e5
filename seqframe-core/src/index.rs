//! Read-only view over the keys of a series

use std::fmt;

use crate::source::{self, Element, IntoSequence, Pass, SeqRef};

/// The ordered keys of a [`Series`](crate::Series) or
/// [`DataFrame`](crate::DataFrame)
///
/// Holds no storage of its own; it shares the key stream of the entity that
/// produced it and can outlive any single pass over it.
#[derive(Clone)]
pub struct Index<I> {
    keys: SeqRef<I>,
}

impl<I: Element> Index<I> {
    pub(crate) fn new(keys: SeqRef<I>) -> Self {
        Self { keys }
    }

    /// Begin a fresh pass over the keys
    pub fn iter(&self) -> Pass<'_, I> {
        self.keys.pass()
    }

    /// Materialize the keys
    pub fn to_vec(&self) -> Vec<I> {
        source::drain(&*self.keys)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        source::count(&*self.keys)
    }

    /// Whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.pass().next().is_none()
    }
}

impl<I: Element> IntoSequence<I> for Index<I> {
    fn into_sequence(self) -> SeqRef<I> {
        self.keys
    }
}

impl<I> fmt::Debug for Index<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("len_hint", &self.keys.len_hint())
            .finish_non_exhaustive()
    }
}

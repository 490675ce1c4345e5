//! Indexed, lazily-evaluated series
//!
//! A [`Series`] owns three shared sequence descriptors: the index, the
//! values and the (index, value) pairs. They are kept in step so that every
//! full pass over any of them has the same length and the k-th pair is the
//! k-th key with the k-th value. Every operation composes new descriptors
//! around the existing ones and returns a new series; nothing is evaluated
//! until a pass is pulled.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::index::Index;
use crate::slice::{SkipSequence, TakeSequence};
use crate::source::{self, CountingSequence, Element, IntoSequence, Pass, SeqRef};
use crate::transform::{FilterSequence, ProjectionSequence};
use crate::zip::{keys_of, values_of, zip};

/// An ordered collection of values paired one-to-one with index keys
pub struct Series<I, V> {
    index: SeqRef<I>,
    values: SeqRef<V>,
    pairs: SeqRef<(I, V)>,
    baked: bool,
}

impl<I, V> Clone for Series<I, V> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            values: Arc::clone(&self.values),
            pairs: Arc::clone(&self.pairs),
            baked: self.baked,
        }
    }
}

impl<V: Element> Series<usize, V> {
    /// Create a series over `values`, keyed 0, 1, 2, ...
    pub fn new(values: Vec<V>) -> Self {
        Self::aligned(Arc::new(CountingSequence::<usize>::new()), values.into_sequence())
    }
}

impl<I: Element, V: Element> Series<I, V> {
    pub(crate) fn from_parts(
        index: SeqRef<I>,
        values: SeqRef<V>,
        pairs: SeqRef<(I, V)>,
        baked: bool,
    ) -> Self {
        Self {
            index,
            values,
            pairs,
            baked,
        }
    }

    /// Pair `index` with `values`, re-deriving whichever side may run longer
    /// from the pairs so all three streams stay the same length.
    ///
    /// At least one side must be bounded.
    pub(crate) fn aligned(index: SeqRef<I>, values: SeqRef<V>) -> Self {
        let pairs = zip(Arc::clone(&index), Arc::clone(&values));
        let (index, values) = match (index.len_hint(), values.len_hint()) {
            (Some(keys), Some(len)) if keys == len => (index, values),
            _ if !index.is_bounded() => (keys_of(Arc::clone(&pairs)), values),
            _ => (keys_of(Arc::clone(&pairs)), values_of(Arc::clone(&pairs))),
        };
        Self::from_parts(index, values, pairs, false)
    }

    /// Derive index and values from a pairs stream
    pub(crate) fn from_pairs_sequence(pairs: SeqRef<(I, V)>) -> Self {
        let index = keys_of(Arc::clone(&pairs));
        let values = values_of(Arc::clone(&pairs));
        Self::from_parts(index, values, pairs, false)
    }

    /// Create a series from (index, value) pairs
    pub fn from_pairs(pairs: Vec<(I, V)>) -> Self {
        Self::from_pairs_sequence(pairs.into_sequence())
    }

    /// Begin a fresh pass over the values
    ///
    /// Only the value pipeline is walked; index and pairs are untouched.
    pub fn iter(&self) -> Pass<'_, V> {
        self.values.pass()
    }

    /// Begin a fresh pass over the (index, value) pairs
    pub fn iter_pairs(&self) -> Pass<'_, (I, V)> {
        self.pairs.pass()
    }

    /// View over the index keys
    pub fn get_index(&self) -> Index<I> {
        Index::new(Arc::clone(&self.index))
    }

    /// Materialize the values
    ///
    /// Evaluates the value pipeline for this call only; nothing is cached.
    pub fn to_vec(&self) -> Vec<V> {
        source::drain(&*self.values)
    }

    /// Materialize the (index, value) pairs
    pub fn to_pairs(&self) -> Vec<(I, V)> {
        source::drain(&*self.pairs)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        source::count(&*self.values)
    }

    /// Whether the series has no values
    pub fn is_empty(&self) -> bool {
        self.values.pass().next().is_none()
    }

    /// The first value, if any
    pub fn first(&self) -> Option<V> {
        self.values.pass().next()
    }

    /// The last value, if any
    pub fn last(&self) -> Option<V> {
        match self.values.as_slice() {
            Some(items) => items.last().cloned(),
            None => self.values.pass().last(),
        }
    }

    /// Whether the streams are backed by concrete storage
    pub fn is_baked(&self) -> bool {
        self.baked
    }

    /// Drop the first `count` rows
    ///
    /// Skipping past the end gives an empty series. The result is deferred
    /// even when `self` is baked.
    pub fn skip(&self, count: isize) -> Result<Self> {
        let index: SeqRef<I> = Arc::new(SkipSequence::new(Arc::clone(&self.index), count)?);
        let values: SeqRef<V> = Arc::new(SkipSequence::new(Arc::clone(&self.values), count)?);
        let pairs: SeqRef<(I, V)> =
            Arc::new(SkipSequence::new(Arc::clone(&self.pairs), count)?);
        Ok(Self::from_parts(index, values, pairs, false))
    }

    /// Keep at most the first `count` rows
    pub fn take(&self, count: isize) -> Result<Self> {
        let index: SeqRef<I> = Arc::new(TakeSequence::new(Arc::clone(&self.index), count)?);
        let values: SeqRef<V> = Arc::new(TakeSequence::new(Arc::clone(&self.values), count)?);
        let pairs: SeqRef<(I, V)> =
            Arc::new(TakeSequence::new(Arc::clone(&self.pairs), count)?);
        Ok(Self::from_parts(index, values, pairs, false))
    }

    /// Transform every value, keeping the index
    ///
    /// The pairs are rebuilt from the shared index and the new values rather
    /// than projected, so each transformed value stays with its original key.
    pub fn select<U, F>(&self, transform: F) -> Series<I, U>
    where
        U: Element,
        F: Fn(V) -> U + Send + Sync + 'static,
    {
        let values: SeqRef<U> = Arc::new(ProjectionSequence::new(
            Arc::clone(&self.values),
            transform,
        ));
        let pairs = zip(Arc::clone(&self.index), Arc::clone(&values));
        Series::from_parts(Arc::clone(&self.index), values, pairs, false)
    }

    /// Keep the rows whose value satisfies `predicate`
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let pairs: SeqRef<(I, V)> = Arc::new(FilterSequence::new(
            Arc::clone(&self.pairs),
            move |(_, value): &(I, V)| predicate(value),
        ));
        Self::from_pairs_sequence(pairs)
    }

    /// Re-key the values with `index`
    ///
    /// The result has `min(len(index), len(self))` rows.
    pub fn with_index<J: Element>(&self, index: impl IntoSequence<J>) -> Series<J, V> {
        Series::aligned(index.into_sequence(), Arc::clone(&self.values))
    }

    /// Re-key the values 0, 1, 2, ...
    pub fn reset_index(&self) -> Series<usize, V> {
        self.with_index(CountingSequence::<usize>::new())
    }

    /// Materialize all three streams into concrete storage
    ///
    /// A single pass over the pairs feeds the index and values too. Baking
    /// a baked series is a clone.
    pub fn bake(&self) -> Self {
        if self.baked {
            return self.clone();
        }
        let pairs = source::drain(&*self.pairs);
        let (index, values): (Vec<I>, Vec<V>) = pairs.iter().cloned().unzip();
        debug!(rows = pairs.len(), "baked series");
        Self::from_parts(
            index.into_sequence(),
            values.into_sequence(),
            pairs.into_sequence(),
            true,
        )
    }
}

impl<'a, I: Element, V: Element> IntoIterator for &'a Series<I, V> {
    type Item = V;
    type IntoIter = Pass<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I, V> fmt::Debug for Series<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("baked", &self.baked)
            .field("len_hint", &self.values.len_hint())
            .finish_non_exhaustive()
    }
}

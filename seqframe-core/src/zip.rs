//! Pairing sequences and pulling single slots back out of tuples

use std::fmt;
use std::sync::Arc;

use crate::source::{Element, Pass, RestartableSequence, SeqRef};

/// Walks two upstream passes in lockstep, stopping at the shorter one
///
/// Truncation to the shorter input is the expected behavior, not an error.
/// It is also the only thing that bounds a
/// [`CountingSequence`](crate::source::CountingSequence).
pub struct PairZipSequence<A, B> {
    left: SeqRef<A>,
    right: SeqRef<B>,
}

impl<A, B> PairZipSequence<A, B> {
    /// Pair `left` with `right`
    pub fn new(left: SeqRef<A>, right: SeqRef<B>) -> Self {
        Self { left, right }
    }
}

impl<A, B> fmt::Debug for PairZipSequence<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairZipSequence")
            .field("left_len", &self.left.len_hint())
            .field("right_len", &self.right.len_hint())
            .finish()
    }
}

impl<A, B> RestartableSequence<(A, B)> for PairZipSequence<A, B> {
    fn pass(&self) -> Pass<'_, (A, B)> {
        Box::new(self.left.pass().zip(self.right.pass()))
    }

    fn is_bounded(&self) -> bool {
        self.left.is_bounded() || self.right.is_bounded()
    }

    fn len_hint(&self) -> Option<usize> {
        match (self.left.len_hint(), self.right.len_hint()) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (Some(left), None) if !self.right.is_bounded() => Some(left),
            (None, Some(right)) if !self.left.is_bounded() => Some(right),
            _ => None,
        }
    }
}

/// Tuples whose slot `SLOT` can be moved out
///
/// The slot is checked against the tuple's arity at compile time, so an
/// extractor for a slot the tuple does not have cannot be built.
pub trait TupleSlot<const SLOT: usize> {
    /// Type stored in the slot
    type Output;

    /// Consume the tuple, keeping only the slot
    fn into_slot(self) -> Self::Output;
}

macro_rules! impl_tuple_slot {
    ($slot:tt => $out:ident; $($ty:ident),+) => {
        impl<$($ty),+> TupleSlot<$slot> for ($($ty,)+) {
            type Output = $out;

            fn into_slot(self) -> Self::Output {
                self.$slot
            }
        }
    };
}

impl_tuple_slot!(0 => A; A, B);
impl_tuple_slot!(1 => B; A, B);
impl_tuple_slot!(0 => A; A, B, C);
impl_tuple_slot!(1 => B; A, B, C);
impl_tuple_slot!(2 => C; A, B, C);

/// Yields slot `SLOT` of every tuple of an upstream pass
///
/// Derives an index-only or value-only stream from a pairs stream.
pub struct ElementExtractSequence<P, const SLOT: usize> {
    upstream: SeqRef<P>,
}

impl<P, const SLOT: usize> ElementExtractSequence<P, SLOT> {
    /// Extract slot `SLOT` from every tuple of `upstream`
    pub fn new(upstream: SeqRef<P>) -> Self {
        Self { upstream }
    }
}

impl<P, const SLOT: usize> fmt::Debug for ElementExtractSequence<P, SLOT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementExtractSequence")
            .field("slot", &SLOT)
            .finish_non_exhaustive()
    }
}

impl<P, const SLOT: usize> RestartableSequence<<P as TupleSlot<SLOT>>::Output>
    for ElementExtractSequence<P, SLOT>
where
    P: TupleSlot<SLOT>,
{
    fn pass(&self) -> Pass<'_, <P as TupleSlot<SLOT>>::Output> {
        Box::new(self.upstream.pass().map(<P as TupleSlot<SLOT>>::into_slot))
    }

    fn is_bounded(&self) -> bool {
        self.upstream.is_bounded()
    }

    fn len_hint(&self) -> Option<usize> {
        self.upstream.len_hint()
    }
}

/// Pair two sequences into a shared pairs descriptor
pub fn zip<A: Element, B: Element>(left: SeqRef<A>, right: SeqRef<B>) -> SeqRef<(A, B)> {
    Arc::new(PairZipSequence::new(left, right))
}

/// The index stream of a pairs stream
pub fn keys_of<I: Element, V: Element>(pairs: SeqRef<(I, V)>) -> SeqRef<I> {
    Arc::new(ElementExtractSequence::<(I, V), 0>::new(pairs))
}

/// The value stream of a pairs stream
pub fn values_of<I: Element, V: Element>(pairs: SeqRef<(I, V)>) -> SeqRef<V> {
    Arc::new(ElementExtractSequence::<(I, V), 1>::new(pairs))
}

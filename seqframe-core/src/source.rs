//! Restartable sequences and the two leaf sources
//!
//! A [`RestartableSequence`] is a stateless descriptor: asking it for a
//! [`Pass`] allocates only the cursor for that pass, so the same descriptor
//! can be walked any number of times, by any number of readers, without one
//! pass observing another. Descriptors are shared between entities through
//! [`SeqRef`] handles.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};

/// One left-to-right traversal of a sequence
pub type Pass<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Shared handle to an immutable sequence descriptor
pub type SeqRef<T> = Arc<dyn RestartableSequence<T>>;

/// Bound shared by everything that flows through a pipeline
pub trait Element: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Element for T {}

/// A source that can produce a fresh, independent pass any number of times
pub trait RestartableSequence<T>: Send + Sync {
    /// Begin a new pass from the first element
    fn pass(&self) -> Pass<'_, T>;

    /// Whether every pass terminates
    fn is_bounded(&self) -> bool {
        true
    }

    /// Exact number of elements per pass, when known without iterating
    fn len_hint(&self) -> Option<usize> {
        None
    }

    /// Concrete backing storage, for sequences that have it
    fn as_slice(&self) -> Option<&[T]> {
        None
    }
}

/// Types a [`CountingSequence`] can generate from a row position
pub trait Ordinal: Element {
    /// The key for position `n`
    fn from_ordinal(n: usize) -> Self;
}

macro_rules! impl_ordinal {
    ($($ty:ty),*) => {
        $(
            impl Ordinal for $ty {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn from_ordinal(n: usize) -> Self {
                    n as $ty
                }
            }
        )*
    };
}

impl_ordinal!(usize, u32, u64, i32, i64);

impl Ordinal for serde_json::Value {
    fn from_ordinal(n: usize) -> Self {
        serde_json::Value::from(n)
    }
}

/// The unbounded sequence 0, 1, 2, ...
///
/// Only a [`PairZipSequence`](crate::zip::PairZipSequence) against a bounded
/// sequence gives it an end.
pub struct CountingSequence<T = usize> {
    _key: PhantomData<fn() -> T>,
}

impl<T: Ordinal> CountingSequence<T> {
    /// Create a counting sequence starting at zero
    pub fn new() -> Self {
        Self { _key: PhantomData }
    }
}

impl<T: Ordinal> Default for CountingSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CountingSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CountingSequence")
    }
}

impl<T: Ordinal> RestartableSequence<T> for CountingSequence<T> {
    fn pass(&self) -> Pass<'_, T> {
        Box::new((0..).map(T::from_ordinal))
    }

    fn is_bounded(&self) -> bool {
        false
    }
}

/// A concrete, memory-resident list replayed from its start on every pass
#[derive(Debug, Clone)]
pub struct MaterializedSequence<T> {
    items: Arc<[T]>,
}

impl<T> MaterializedSequence<T> {
    /// Wrap a list
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// A sequence with no elements
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The backing list
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Element> RestartableSequence<T> for MaterializedSequence<T> {
    fn pass(&self) -> Pass<'_, T> {
        Box::new(self.items.iter().cloned())
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.items)
    }
}

/// Conversion into a shared sequence handle
///
/// This is how construction and re-indexing accept "an ordered collection or
/// anything that can produce passes".
pub trait IntoSequence<T> {
    /// Convert into a shared descriptor
    fn into_sequence(self) -> SeqRef<T>;
}

impl<T: Element> IntoSequence<T> for Vec<T> {
    fn into_sequence(self) -> SeqRef<T> {
        Arc::new(MaterializedSequence::new(self))
    }
}

impl<T: Element> IntoSequence<T> for &[T] {
    fn into_sequence(self) -> SeqRef<T> {
        Arc::new(MaterializedSequence::new(self.to_vec()))
    }
}

impl<T> IntoSequence<T> for SeqRef<T> {
    fn into_sequence(self) -> SeqRef<T> {
        self
    }
}

impl<T: Element> IntoSequence<T> for MaterializedSequence<T> {
    fn into_sequence(self) -> SeqRef<T> {
        Arc::new(self)
    }
}

impl<T: Ordinal> IntoSequence<T> for CountingSequence<T> {
    fn into_sequence(self) -> SeqRef<T> {
        Arc::new(self)
    }
}

/// Drain one full pass into a list
///
/// Callers only hand this bounded sequences; construction rejects anything
/// else.
pub(crate) fn drain<T: Element>(seq: &dyn RestartableSequence<T>) -> Vec<T> {
    debug_assert!(seq.is_bounded(), "draining an unbounded sequence");
    if let Some(items) = seq.as_slice() {
        return items.to_vec();
    }
    let items: Vec<T> = seq.pass().collect();
    trace!(len = items.len(), "drained deferred sequence");
    items
}

/// Count the elements of one pass without keeping them
pub(crate) fn count<T>(seq: &dyn RestartableSequence<T>) -> usize {
    seq.len_hint().unwrap_or_else(|| seq.pass().count())
}

/// Reject a sequence that would never finish a pass
pub(crate) fn ensure_bounded<T>(seq: &dyn RestartableSequence<T>, field: &str) -> Result<()> {
    if seq.is_bounded() {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            field,
            "unbounded sequence cannot be materialized",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_restarts_at_zero() {
        let seq = CountingSequence::<usize>::new();
        let first: Vec<_> = seq.pass().take(3).collect();
        let second: Vec<_> = seq.pass().take(2).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![0, 1]);
        assert!(!seq.is_bounded());
        assert_eq!(seq.len_hint(), None);
    }

    #[test]
    fn counting_generates_json_numbers() {
        let seq = CountingSequence::<serde_json::Value>::new();
        let keys: Vec<_> = seq.pass().take(2).collect();
        assert_eq!(keys, vec![serde_json::json!(0), serde_json::json!(1)]);
    }

    #[test]
    fn materialized_passes_are_independent() {
        let seq = MaterializedSequence::new(vec!["a", "b", "c"]);
        let mut outer = seq.pass();
        assert_eq!(outer.next(), Some("a"));

        let inner: Vec<_> = seq.pass().collect();
        assert_eq!(inner, vec!["a", "b", "c"]);

        assert_eq!(outer.next(), Some("b"));
        assert_eq!(seq.len_hint(), Some(3));
    }

    #[test]
    fn drain_uses_backing_storage() {
        let seq = MaterializedSequence::new(vec![1, 2, 3]);
        assert_eq!(drain(&seq), vec![1, 2, 3]);
        assert_eq!(count(&seq), 3);
    }

    #[test]
    fn ensure_bounded_names_field() {
        let seq = CountingSequence::<usize>::new();
        let err = ensure_bounded(&seq, "values").unwrap_err();
        assert_eq!(err.field(), Some("values"));
        assert!(ensure_bounded(&MaterializedSequence::new(vec![1]), "values").is_ok());
    }
}

//! Positional windows over a pass: skipping a prefix or keeping one

use std::fmt;

use crate::error::{Error, Result};
use crate::source::{Pass, RestartableSequence, SeqRef};

/// Validate a caller-supplied element count
pub(crate) fn checked_count(count: isize, field: &str) -> Result<usize> {
    usize::try_from(count).map_err(|_| {
        Error::invalid_argument(field, format!("count must not be negative, got {count}"))
    })
}

/// Discards the first `count` elements of every pass
pub struct SkipSequence<T> {
    upstream: SeqRef<T>,
    count: usize,
}

impl<T> SkipSequence<T> {
    /// Skip `count` leading elements; a negative count is rejected
    pub fn new(upstream: SeqRef<T>, count: isize) -> Result<Self> {
        let count = checked_count(count, "skip")?;
        Ok(Self { upstream, count })
    }

    /// Number of elements dropped per pass
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T> fmt::Debug for SkipSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipSequence")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> RestartableSequence<T> for SkipSequence<T> {
    fn pass(&self) -> Pass<'_, T> {
        // slice iterators skip in O(1)
        if let Some(items) = self.upstream.as_slice() {
            return Box::new(items.iter().skip(self.count).cloned());
        }
        Box::new(self.upstream.pass().skip(self.count))
    }

    fn is_bounded(&self) -> bool {
        self.upstream.is_bounded()
    }

    fn len_hint(&self) -> Option<usize> {
        self.upstream
            .len_hint()
            .map(|len| len.saturating_sub(self.count))
    }
}

/// Yields at most the first `count` elements of every pass
///
/// Unlike the other adapters this bounds an unbounded upstream.
pub struct TakeSequence<T> {
    upstream: SeqRef<T>,
    count: usize,
}

impl<T> TakeSequence<T> {
    /// Keep `count` leading elements; a negative count is rejected
    pub fn new(upstream: SeqRef<T>, count: isize) -> Result<Self> {
        let count = checked_count(count, "take")?;
        Ok(Self { upstream, count })
    }
}

impl<T> fmt::Debug for TakeSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TakeSequence")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<T> RestartableSequence<T> for TakeSequence<T> {
    fn pass(&self) -> Pass<'_, T> {
        Box::new(self.upstream.pass().take(self.count))
    }

    fn len_hint(&self) -> Option<usize> {
        match self.upstream.len_hint() {
            Some(len) => Some(len.min(self.count)),
            None if !self.upstream.is_bounded() => Some(self.count),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use test_case::test_case;

    use super::*;
    use crate::source::{CountingSequence, IntoSequence};
    use crate::transform::ProjectionSequence;

    #[test_case(0, vec![1, 2, 3] ; "skip nothing")]
    #[test_case(2, vec![3] ; "skip prefix")]
    #[test_case(3, vec![] ; "skip everything")]
    #[test_case(10, vec![] ; "skip past end")]
    fn skip_drops_prefix(count: isize, expected: Vec<i32>) {
        let seq = SkipSequence::new(vec![1, 2, 3].into_sequence(), count).unwrap();
        assert_eq!(seq.pass().collect::<Vec<_>>(), expected);
        assert_eq!(seq.len_hint(), Some(expected.len()));
    }

    #[test]
    fn skip_over_deferred_upstream() {
        let upstream: SeqRef<i32> = Arc::new(ProjectionSequence::new(
            vec![1, 2, 3, 4].into_sequence(),
            |x: i32| x + 1,
        ));
        let seq = SkipSequence::new(upstream, 1).unwrap();
        assert_eq!(seq.pass().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(seq.pass().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn negative_skip_is_rejected() {
        let err = SkipSequence::new(vec![1].into_sequence(), -1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert_eq!(err.field(), Some("skip"));
    }

    #[test]
    fn take_bounds_counting_sequence() {
        let counter: SeqRef<usize> = Arc::new(CountingSequence::new());
        let seq = TakeSequence::new(counter, 3).unwrap();
        assert!(seq.is_bounded());
        assert_eq!(seq.len_hint(), Some(3));
        assert_eq!(seq.pass().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn negative_take_is_rejected() {
        let err = TakeSequence::new(vec![1].into_sequence(), -4).unwrap_err();
        assert_eq!(err.field(), Some("take"));
    }
}

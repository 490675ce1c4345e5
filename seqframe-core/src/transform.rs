//! Per-element transforms applied lazily to each pass

use std::fmt;
use std::sync::Arc;

use crate::source::{Pass, RestartableSequence, SeqRef};

/// A user transform from one element to another
pub type TransformFn<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// A user predicate over an element
pub type PredicateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Applies a transform to every upstream element, one at a time, in order
///
/// The transform runs exactly once per element per pass, and only for the
/// elements a reader actually pulls.
pub struct ProjectionSequence<T, R> {
    upstream: SeqRef<T>,
    transform: TransformFn<T, R>,
}

impl<T, R> ProjectionSequence<T, R> {
    /// Create a projection over `upstream`
    pub fn new<F>(upstream: SeqRef<T>, transform: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            upstream,
            transform: Arc::new(transform),
        }
    }
}

impl<T, R> fmt::Debug for ProjectionSequence<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionSequence")
            .field("len_hint", &self.upstream.len_hint())
            .finish_non_exhaustive()
    }
}

impl<T, R> RestartableSequence<R> for ProjectionSequence<T, R> {
    fn pass(&self) -> Pass<'_, R> {
        let transform = &self.transform;
        Box::new(self.upstream.pass().map(move |item| transform(item)))
    }

    fn is_bounded(&self) -> bool {
        self.upstream.is_bounded()
    }

    fn len_hint(&self) -> Option<usize> {
        self.upstream.len_hint()
    }
}

/// Yields only the upstream elements that satisfy a predicate
pub struct FilterSequence<T> {
    upstream: SeqRef<T>,
    predicate: PredicateFn<T>,
}

impl<T> FilterSequence<T> {
    /// Create a filter over `upstream`
    pub fn new<F>(upstream: SeqRef<T>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            upstream,
            predicate: Arc::new(predicate),
        }
    }
}

impl<T> fmt::Debug for FilterSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSequence").finish_non_exhaustive()
    }
}

impl<T> RestartableSequence<T> for FilterSequence<T> {
    fn pass(&self) -> Pass<'_, T> {
        let predicate = &self.predicate;
        Box::new(self.upstream.pass().filter(move |item| predicate(item)))
    }

    fn is_bounded(&self) -> bool {
        self.upstream.is_bounded()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::source::IntoSequence;

    #[test]
    fn projection_is_lazy_and_runs_once_per_pulled_element() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let seq = ProjectionSequence::new(vec![1, 2, 3].into_sequence(), move |x: i32| {
            counter.fetch_add(1, Ordering::SeqCst);
            x * 10
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first: Vec<_> = seq.pass().take(2).collect();
        assert_eq!(first, vec![10, 20]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let all: Vec<_> = seq.pass().collect();
        assert_eq!(all, vec![10, 20, 30]);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(seq.len_hint(), Some(3));
    }

    #[test]
    fn filter_keeps_matching_elements() {
        let seq = FilterSequence::new(vec![1, 2, 3, 4].into_sequence(), |x: &i32| x % 2 == 0);
        assert_eq!(seq.pass().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(seq.len_hint(), None);
        assert!(seq.is_bounded());
    }
}

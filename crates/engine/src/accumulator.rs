use crate::group::ConsolidatedSpan;
use crate::options::Options;
use std::cmp::Ordering;
use std::sync::Arc;
use sweep_primitives::{Domain, Span, SpanError};


/// Single pass fold of one sorted span stream into [ConsolidatedSpan]s.
pub struct Accumulator<D: Domain, T = ()> {
    domain: Arc<D>,
    options: Options,
    current: Option<ConsolidatedSpan<D::Value, T>>,
    position: Option<usize>,
    error: Option<SpanError>
}


impl<D: Domain, T> Accumulator<D, T> {
    pub fn new(domain: Arc<D>, options: Options) -> Self {
        Self {
            domain,
            options,
            current: None,
            position: None,
            error: None
        }
    }

    /// The open group, not yet final.
    pub fn current(&self) -> Option<&ConsolidatedSpan<D::Value, T>> {
        self.current.as_ref()
    }

    /// Source position of the last accumulated span.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn error(&self) -> Option<SpanError> {
        self.error
    }

    /// Takes the open group, if any.
    pub fn finish(&mut self) -> Option<ConsolidatedSpan<D::Value, T>> {
        self.current.take()
    }

    fn validate(&self, span: &Span<D::Value, T>) -> Result<(), SpanError> {
        if self.options.validate {
            self.domain.check(span, self.current.as_ref().map(|g| g.bound()))?;
        }
        if self.options.tag_required && span.tag().is_none() {
            return Err(SpanError::MissingTag)
        }
        Ok(())
    }
}


impl<D: Domain, T> Accumulator<D, T>
where
    D::Value: Clone
{
    /// Folds `span` into the open group.
    ///
    /// Returns the group `span` has finalized, if any. Once a span fails
    /// validation the open group is marked with the error and the
    /// accumulator ignores all further input.
    pub fn accumulate(&mut self, span: Span<D::Value, T>) -> Option<ConsolidatedSpan<D::Value, T>> {
        let position = self.position.map_or(0, |p| p + 1);
        self.position = Some(position);

        if self.error.is_some() {
            return None
        }

        if let Err(error) = self.validate(&span) {
            self.error = Some(error);
            self.current
                .get_or_insert_with(|| ConsolidatedSpan::new(span, position))
                .poison(error);
            return None
        }

        let group = match self.current.as_mut() {
            Some(group) => group,
            None => {
                self.current = Some(ConsolidatedSpan::new(span, position));
                return None
            }
        };

        let domain = &*self.domain;
        if domain.cmp(group.bound().end(), span.begin()) == Ordering::Less {
            let adjacent = self.options.consolidate
                && domain.cmp(&domain.next(group.bound().end()), span.begin()) == Ordering::Equal;
            if adjacent {
                group.absorb(domain, span, position);
                None
            } else {
                Some(std::mem::replace(group, ConsolidatedSpan::new(span, position)))
            }
        } else {
            group.absorb(domain, span, position);
            None
        }
    }
}


/// Iterator of groups over a span iterator.
///
/// A poisoned group is yielded as the last item.
pub struct Groups<D: Domain, T, I> {
    accumulator: Accumulator<D, T>,
    spans: Option<I>
}


impl<D: Domain, T, I> Groups<D, T, I> {
    pub fn new(accumulator: Accumulator<D, T>, spans: I) -> Self {
        Self {
            accumulator,
            spans: Some(spans)
        }
    }

    pub fn error(&self) -> Option<SpanError> {
        self.accumulator.error()
    }
}


impl<D, T, I> Iterator for Groups<D, T, I>
where
    D: Domain,
    D::Value: Clone,
    I: Iterator<Item = Span<D::Value, T>>
{
    type Item = ConsolidatedSpan<D::Value, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(spans) = self.spans.as_mut() {
            let Some(span) = spans.next() else {
                self.spans = None;
                return self.accumulator.finish()
            };
            if let Some(group) = self.accumulator.accumulate(span) {
                return Some(group)
            }
            if self.accumulator.error().is_some() {
                self.spans = None;
                return self.accumulator.finish()
            }
        }
        None
    }
}


#[cfg(test)]
mod test {
    use super::Accumulator;
    use crate::Options;
    use std::sync::Arc;
    use sweep_primitives::{Ordered, Span, SpanError};


    fn accumulator(options: Options) -> Accumulator<Ordered<i32>> {
        Accumulator::new(Arc::new(Ordered::new()), options)
    }


    fn span(begin: i32, end: i32) -> Span<i32> {
        Span::new_unchecked(begin, end, None)
    }


    #[test]
    fn overlap_extends_open_group() {
        let mut acc = accumulator(Options::default());
        assert!(acc.accumulate(span(1, 3)).is_none());
        assert!(acc.accumulate(span(2, 5)).is_none());
        assert!(acc.accumulate(span(5, 5)).is_none());
        let group = acc.current().unwrap();
        assert_eq!(group.bound(), &span(1, 5));
        assert_eq!((group.src_begin(), group.src_end()), (0, 2));
        assert_eq!(acc.position(), Some(2));
    }

    #[test]
    fn gap_finalizes_group() {
        let mut acc = accumulator(Options::default());
        acc.accumulate(span(1, 3));
        let done = acc.accumulate(span(4, 4)).unwrap();
        assert_eq!(done.bound(), &span(1, 3));
        assert!(done.is_unique());
        assert_eq!(acc.current().unwrap().src_begin(), 1);
    }

    #[test]
    fn adjacency_merges_only_when_consolidating() {
        let mut acc = accumulator(Options::default().with_consolidate(true));
        acc.accumulate(span(1, 3));
        assert!(acc.accumulate(span(4, 4)).is_none());
        let done = acc.accumulate(span(6, 6)).unwrap();
        assert_eq!(done.bound(), &span(1, 4));
        assert_eq!((done.src_begin(), done.src_end()), (0, 1));
    }

    #[test]
    fn validation_error_is_sticky() {
        let mut acc = accumulator(Options::default().with_validate(true));
        acc.accumulate(span(9, 11));
        assert!(acc.accumulate(span(2, 2)).is_none());
        assert_eq!(acc.error(), Some(SpanError::OutOfOrder));
        assert!(acc.accumulate(span(12, 12)).is_none());

        let group = acc.finish().unwrap();
        assert_eq!(group.error(), Some(SpanError::OutOfOrder));
        assert_eq!(group.bound(), &span(9, 11));
        assert_eq!(acc.position(), Some(2));
    }

    #[test]
    fn invalid_first_span_starts_poisoned_group() {
        let mut acc = accumulator(Options::default().with_validate(true));
        acc.accumulate(span(5, 1));
        let group = acc.finish().unwrap();
        assert_eq!(group.error(), Some(SpanError::InvalidRange));
    }

    #[test]
    fn missing_tag_is_rejected() {
        let mut acc = Accumulator::<_, u32>::new(
            Arc::new(Ordered::<i32>::new()),
            Options::default().with_tag_required(true)
        );
        acc.accumulate(Span::new_unchecked(1, 2, Some(7)));
        acc.accumulate(Span::new_unchecked(2, 3, None));
        assert_eq!(acc.error(), Some(SpanError::MissingTag));
    }
}

use sweep_primitives::{Bounds, Domain, Span, SpanError};


/// One or more overlapping (or adjacent) spans of a single source folded
/// into their bounding span.
///
/// Absorbed spans always occupy consecutive source positions
/// `src_begin..=src_end`. A group handed out by an accumulator is final.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConsolidatedSpan<E, T = ()> {
    bound: Span<E, T>,
    members: Option<Vec<Span<E, T>>>,
    src_begin: usize,
    src_end: usize,
    error: Option<SpanError>
}


impl<E, T> ConsolidatedSpan<E, T> {
    pub fn new(span: Span<E, T>, position: usize) -> Self {
        Self {
            bound: span,
            members: None,
            src_begin: position,
            src_end: position,
            error: None
        }
    }

    /// Bounding span of all members.
    ///
    /// For a unique group this is the absorbed span itself, tag included.
    pub fn bound(&self) -> &Span<E, T> {
        &self.bound
    }

    /// `None` when exactly one span was absorbed.
    pub fn members(&self) -> Option<&[Span<E, T>]> {
        self.members.as_deref()
    }

    pub fn is_unique(&self) -> bool {
        self.members.is_none()
    }

    pub fn len(&self) -> usize {
        self.member_slice().len()
    }

    pub fn src_begin(&self) -> usize {
        self.src_begin
    }

    pub fn src_end(&self) -> usize {
        self.src_end
    }

    pub fn error(&self) -> Option<SpanError> {
        self.error
    }

    pub fn first_member(&self) -> (usize, &Span<E, T>) {
        (self.src_begin, &self.member_slice()[0])
    }

    pub fn last_member(&self) -> (usize, &Span<E, T>) {
        let members = self.member_slice();
        (self.src_end, &members[members.len() - 1])
    }

    /// Absorbed spans with their source positions.
    pub fn sources(&self) -> impl Iterator<Item = (usize, &Span<E, T>)> + '_ {
        self.member_slice()
            .iter()
            .enumerate()
            .map(|(i, span)| (self.src_begin + i, span))
    }

    fn member_slice(&self) -> &[Span<E, T>] {
        match self.members.as_ref() {
            Some(members) => members,
            None => std::slice::from_ref(&self.bound)
        }
    }

    pub(crate) fn absorb<D>(&mut self, domain: &D, span: Span<E, T>, position: usize)
    where
        D: Domain<Value = E> + ?Sized,
        E: Clone
    {
        let (begin, end, _) = domain.union(&self.bound, &span).into_parts();
        let prev = std::mem::replace(&mut self.bound, Span::new_unchecked(begin, end, None));
        match self.members.as_mut() {
            Some(members) => members.push(span),
            None => self.members = Some(vec![prev, span])
        }
        self.src_end = position;
    }

    pub(crate) fn poison(&mut self, error: SpanError) {
        self.error = Some(error)
    }
}


impl<E, T> Bounds<E> for ConsolidatedSpan<E, T> {
    #[inline]
    fn begin(&self) -> &E {
        self.bound.begin()
    }

    #[inline]
    fn end(&self) -> &E {
        self.bound.end()
    }
}

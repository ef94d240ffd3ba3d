use crate::group::ConsolidatedSpan;
use std::cmp::Ordering;
use std::sync::Arc;
use sweep_primitives::{Bounds, Domain, Span, SpanError};


pub type GroupRef<E, T = ()> = Arc<ConsolidatedSpan<E, T>>;


/// Forward only view of one source answering which of its groups overlap
/// a probe.
///
/// Probes must be supplied in non-decreasing order of their end.
pub struct SourceCursor<D: Domain, T = ()> {
    domain: Arc<D>,
    groups: Option<Box<dyn Iterator<Item = ConsolidatedSpan<D::Value, T>>>>,
    buffer: Vec<GroupRef<D::Value, T>>,
    src_start: Option<usize>,
    src_end: Option<usize>,
    pending: Option<GroupRef<D::Value, T>>,
    error: Option<SpanError>,
    closed: bool,
    on_close: Vec<Box<dyn FnOnce()>>
}


impl<D: Domain, T> SourceCursor<D, T> {
    /// Creates a cursor over `groups` and pulls the first one.
    ///
    /// For channel backed sequences this blocks until the producer either
    /// publishes a group or closes the channel.
    pub fn new<I>(domain: Arc<D>, groups: I) -> Self
    where
        I: IntoIterator<Item = ConsolidatedSpan<D::Value, T>>,
        I::IntoIter: 'static
    {
        let mut cursor = Self {
            domain,
            groups: Some(Box::new(groups.into_iter().fuse())),
            buffer: Vec::new(),
            src_start: None,
            src_end: None,
            pending: None,
            error: None,
            closed: false,
            on_close: Vec::new()
        };
        cursor.pending = cursor.pull();
        cursor
    }

    pub fn has_next(&self) -> bool {
        !self.closed && self.pending.is_some()
    }

    /// Whether the last probe overlapped anything.
    pub fn in_overlap(&self) -> bool {
        self.has_next() && self.src_start.is_some()
    }

    /// Groups overlapping the last probe, in source order.
    pub fn overlaps(&self) -> &[GroupRef<D::Value, T>] {
        &self.buffer
    }

    pub fn src_start(&self) -> Option<usize> {
        self.src_start
    }

    pub fn src_end(&self) -> Option<usize> {
        self.src_end
    }

    /// Look-ahead group, not yet ruled out for later probes.
    pub fn pending(&self) -> Option<&GroupRef<D::Value, T>> {
        self.pending.as_ref()
    }

    pub fn error(&self) -> Option<SpanError> {
        self.error
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// First span overlapping the last probe, with its source position.
    pub fn first_span(&self) -> Option<(usize, &Span<D::Value, T>)> {
        self.buffer.first().map(|g| g.first_member())
    }

    /// Last span overlapping the last probe, with its source position.
    pub fn last_span(&self) -> Option<(usize, &Span<D::Value, T>)> {
        self.buffer.last().map(|g| g.last_member())
    }

    /// Every source span behind the current overlap.
    pub fn sources(&self) -> impl Iterator<Item = (usize, &Span<D::Value, T>)> + '_ {
        self.buffer.iter().flat_map(|g| g.sources())
    }

    /// Registers `hook` to run once when the cursor closes.
    ///
    /// Runs immediately if the cursor is already closed.
    pub fn on_close(&mut self, hook: impl FnOnce() + 'static) {
        if self.closed {
            hook()
        } else {
            self.on_close.push(Box::new(hook))
        }
    }

    pub fn close(&mut self) {
        if self.closed {
            return
        }
        self.closed = true;
        for hook in std::mem::take(&mut self.on_close) {
            hook()
        }
        self.groups = None;
        self.pending = None;
        self.buffer.clear();
        self.src_start = None;
        self.src_end = None;
    }

    fn pull(&mut self) -> Option<GroupRef<D::Value, T>> {
        if self.error.is_some() {
            return None
        }
        let group = self.groups.as_mut()?.next()?;
        if let Some(error) = group.error() {
            self.error = Some(error);
            self.groups = None;
            return None
        }
        Some(Arc::new(group))
    }
}


impl<D: Domain, T> SourceCursor<D, T> {
    /// Evaluates `probe` against the source.
    ///
    /// Groups retained from the previous probe are re-checked before new
    /// ones are pulled, so a group spanning several probes is reported for
    /// each of them.
    pub fn advance<P>(&mut self, probe: &P)
    where
        P: Bounds<D::Value> + ?Sized
    {
        if self.closed {
            return
        }

        let domain = self.domain.clone();
        let pending = self.pending.take();

        let retained = std::mem::take(&mut self.buffer);
        self.buffer.extend(retained.into_iter().filter(|g| {
            let is_pending = pending.as_ref().is_some_and(|p| Arc::ptr_eq(g, p));
            !is_pending && domain.overlaps(g, probe)
        }));
        self.src_start = self.buffer.first().map(|g| g.src_begin());
        self.src_end = self.buffer.last().map(|g| g.src_end());

        let mut candidate = pending;
        while let Some(group) = candidate {
            if domain.overlaps(&group, probe) {
                self.src_start.get_or_insert(group.src_begin());
                self.src_end = Some(group.src_end());
                self.buffer.push(group.clone());
                if domain.cmp(group.end(), probe.end()) == Ordering::Greater {
                    self.pending = Some(group);
                    return
                }
            } else if domain.cmp(group.begin(), probe.end()) == Ordering::Greater {
                self.pending = Some(group);
                return
            }
            candidate = self.pull();
        }

        // exhausted: keep the last overlap visible for this probe
        if self.error.is_none() {
            self.pending = self.buffer.last().cloned();
        }
    }
}


impl<D: Domain, T> Drop for SourceCursor<D, T> {
    fn drop(&mut self) {
        self.close()
    }
}

use crate::cursor::{GroupRef, SourceCursor};
use std::sync::Arc;
use sweep_primitives::{first_span, next_span, Domain, SourceIndex, Span, SpanError};
use tracing::{debug, trace, warn};


/// Match of one source against a sweep row.
#[derive(Debug, Clone)]
pub struct Match<E, T = ()> {
    pub source: SourceIndex,
    /// Source position of the first span behind the match.
    pub src_start: usize,
    /// Source position of the last span behind the match.
    pub src_end: usize,
    pub groups: Vec<GroupRef<E, T>>
}


/// One atomic interval of the sweep.
#[derive(Debug, Clone)]
pub struct Row<E, T = ()> {
    pub position: usize,
    pub span: Span<E>,
    pub matches: Vec<Match<E, T>>
}


impl<E, T> Row<E, T> {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn get(&self, source: SourceIndex) -> Option<&Match<E, T>> {
        self.matches.iter().find(|m| m.source == source)
    }
}


#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Idle,
    Running(usize),
    Finished
}


/// Walks any number of sources in lock-step, partitioning their combined
/// timeline into atomic intervals.
///
/// A driver runs a single sweep. Dropping it (or the [Sweep]) closes every
/// registered source.
pub struct Driver<D: Domain, T = ()> {
    domain: Arc<D>,
    sources: Vec<SourceCursor<D, T>>,
    active: Vec<SourceIndex>,
    probe: Option<Span<D::Value>>,
    state: State,
    matches: Vec<SourceIndex>,
    error: Option<SpanError>,
    error_source: Option<SourceIndex>,
    started: bool,
    closed: bool,
    close_hooks: Vec<Box<dyn FnOnce()>>
}


impl<D: Domain, T> Driver<D, T> {
    pub fn new(domain: Arc<D>) -> Self {
        Self {
            domain,
            sources: Vec::new(),
            active: Vec::new(),
            probe: None,
            state: State::Idle,
            matches: Vec::new(),
            error: None,
            error_source: None,
            started: false,
            closed: false,
            close_hooks: Vec::new()
        }
    }

    /// Registers a source, `None` once the sweep has started or the driver
    /// is closed.
    pub fn add_source(&mut self, cursor: SourceCursor<D, T>) -> Option<SourceIndex> {
        if self.started || self.closed {
            return None
        }
        self.sources.push(cursor);
        Some(self.sources.len() - 1)
    }

    pub fn on_close(&mut self, hook: impl FnOnce() + 'static) {
        if self.closed {
            hook()
        } else {
            self.close_hooks.push(Box::new(hook))
        }
    }

    pub fn source(&self, index: SourceIndex) -> Option<&SourceCursor<D, T>> {
        self.sources.get(index)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Error that halted the sweep.
    pub fn error(&self) -> Option<SpanError> {
        self.error
    }

    /// Source that reported [Self::error].
    pub fn error_source(&self) -> Option<SourceIndex> {
        self.error_source
    }

    /// Current step, `None` before the first row and after the last one.
    pub fn position(&self) -> Option<usize> {
        match self.state {
            State::Running(position) => Some(position),
            State::Idle | State::Finished => None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    pub fn probe(&self) -> Option<&Span<D::Value>> {
        self.probe.as_ref()
    }

    /// Sources matching the current row.
    pub fn matches(&self) -> &[SourceIndex] {
        &self.matches
    }

    pub fn match_count(&self) -> Option<usize> {
        self.position().map(|_| self.matches.len())
    }

    pub fn close(&mut self) {
        if self.closed {
            return
        }
        self.closed = true;
        if self.state != State::Finished {
            debug!(position =? self.position(), "sweep closed before completion");
            self.finish();
        }
        for source in self.sources.iter_mut() {
            source.close()
        }
        for hook in std::mem::take(&mut self.close_hooks) {
            hook()
        }
    }

    fn finish(&mut self) {
        self.state = State::Finished;
        self.matches.clear();
    }

    fn halt(&mut self, source: SourceIndex, error: SpanError) {
        warn!(source = source, error = %error, "source error halted the sweep");
        self.error = Some(error);
        self.error_source = Some(source);
        self.finish();
    }

    /// Recomputes active sources, `false` when the sweep can not continue.
    fn refresh(&mut self) -> bool {
        let failed = self.sources.iter()
            .enumerate()
            .find_map(|(i, s)| s.error().map(|e| (i, e)));

        if let Some((source, error)) = failed {
            self.halt(source, error);
            return false
        }

        self.active.clear();
        self.active.extend(
            self.sources.iter()
                .enumerate()
                .filter(|(_, s)| s.has_next())
                .map(|(i, _)| i)
        );

        if self.active.is_empty() {
            debug!(position =? self.position(), "all sources exhausted");
            self.finish();
            return false
        }
        true
    }
}


impl<D: Domain, T> Driver<D, T>
where
    D::Value: Clone
{
    /// Starts the sweep.
    pub fn sweep(&mut self) -> Result<Sweep<'_, D, T>, SpanError> {
        if self.started {
            return Err(SpanError::AlreadyStarted)
        }
        if self.closed {
            return Err(SpanError::Closed)
        }
        self.started = true;
        debug!(sources = self.sources.len(), "sweep started");
        Ok(Sweep {
            driver: Some(self)
        })
    }

    /// Like [Self::sweep], but yields nothing when the sweep can't start.
    pub fn iter(&mut self) -> Sweep<'_, D, T> {
        match self.sweep() {
            Ok(sweep) => sweep,
            Err(_) => Sweep {
                driver: None
            }
        }
    }

    fn step(&mut self) -> Option<Row<D::Value, T>> {
        let position = match self.state {
            State::Idle => 0,
            State::Running(position) => position + 1,
            State::Finished => return None
        };

        if !self.refresh() {
            return None
        }

        let bounds: Vec<_> = self.active.iter()
            .filter_map(|&i| self.sources[i].pending().cloned())
            .collect();

        let next = match self.probe.as_ref() {
            None => first_span(&*self.domain, &bounds),
            Some(prev) => next_span(&*self.domain, prev, &bounds)
        };

        let Some(probe) = next else {
            debug!(position, "sweep finished");
            self.finish();
            return None
        };

        for &i in self.active.iter() {
            self.sources[i].advance(&probe);
        }

        let failed = self.active.iter()
            .find_map(|&i| self.sources[i].error().map(|e| (i, e)));

        if let Some((source, error)) = failed {
            self.halt(source, error);
            return None
        }

        self.matches.clear();
        self.matches.extend(
            self.active.iter()
                .copied()
                .filter(|&i| self.sources[i].in_overlap())
        );

        trace!(position, matches = self.matches.len(), "sweep step");

        self.state = State::Running(position);
        self.probe = Some(probe.clone());
        Some(self.row(position, probe))
    }

    fn row(&self, position: usize, span: Span<D::Value>) -> Row<D::Value, T> {
        let matches = self.matches.iter()
            .filter_map(|&i| {
                let cursor = &self.sources[i];
                Some(Match {
                    source: i,
                    src_start: cursor.src_start()?,
                    src_end: cursor.src_end()?,
                    groups: cursor.overlaps().to_vec()
                })
            })
            .collect();

        Row {
            position,
            span,
            matches
        }
    }
}


impl<D: Domain, T> Drop for Driver<D, T> {
    fn drop(&mut self) {
        self.close()
    }
}


/// Single use iteration over the rows of a [Driver].
///
/// Ending the iteration, either by exhausting it or by dropping it early,
/// closes the driver.
pub struct Sweep<'a, D: Domain, T = ()> {
    driver: Option<&'a mut Driver<D, T>>
}


impl<'a, D: Domain, T> Sweep<'a, D, T> {
    pub fn driver(&self) -> Option<&Driver<D, T>> {
        self.driver.as_deref()
    }

    pub fn match_count(&self) -> Option<usize> {
        self.driver.as_ref().and_then(|d| d.match_count())
    }
}


impl<'a, D: Domain, T> Iterator for Sweep<'a, D, T>
where
    D::Value: Clone
{
    type Item = Row<D::Value, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let driver = self.driver.as_mut()?;
        let row = driver.step();
        if row.is_none() {
            driver.close();
            self.driver = None;
        }
        row
    }
}


impl<'a, D: Domain, T> Drop for Sweep<'a, D, T> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.close()
        }
    }
}

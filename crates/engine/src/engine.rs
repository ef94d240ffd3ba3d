use crate::accumulator::{Accumulator, Groups};
use crate::cursor::SourceCursor;
use crate::driver::Driver;
use crate::feed::{self, Feed, FeedControl, FeedSource};
use crate::group::ConsolidatedSpan;
use crate::options::Options;
use std::sync::Arc;
use std::thread::JoinHandle;
use sweep_primitives::{Bounds, Domain, Ordered, Span, SpanError};
use tokio::sync::mpsc;


/// Entry point binding a [Domain] to a set of [Options].
///
/// Every accumulator, source and driver created by one engine shares its
/// domain.
pub struct Engine<D> {
    domain: Arc<D>,
    options: Options
}


impl<D> Clone for Engine<D> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain.clone(),
            options: self.options
        }
    }
}


impl<E: Ord + Clone + sweep_primitives::Successor> Engine<Ordered<E>> {
    /// Engine over the natural order of `E`.
    pub fn ordered(options: Options) -> Self {
        Self::new(Ordered::new(), options)
    }
}


impl<D: Domain> Engine<D> {
    pub fn new(domain: D, options: Options) -> Self {
        Self {
            domain: Arc::new(domain),
            options
        }
    }

    pub fn domain(&self) -> &Arc<D> {
        &self.domain
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn span<T>(&self, begin: D::Value, end: D::Value) -> Result<Span<D::Value, T>, SpanError> {
        if self.options.tag_required {
            return Err(SpanError::MissingTag)
        }
        Span::new(&*self.domain, begin, end, None)
    }

    pub fn tagged_span<T>(&self, begin: D::Value, end: D::Value, tag: T) -> Result<Span<D::Value, T>, SpanError> {
        Span::new(&*self.domain, begin, end, Some(tag))
    }

    /// Sorts `spans` in accumulation order. The sort is stable.
    pub fn sort<T>(&self, spans: &mut [Span<D::Value, T>]) {
        spans.sort_by(|a, b| self.domain.order(a, b))
    }

    pub fn accumulator<T>(&self) -> Accumulator<D, T> {
        Accumulator::new(self.domain.clone(), self.options)
    }

    pub fn groups<T, I>(&self, spans: I) -> Groups<D, T, I::IntoIter>
    where
        I: IntoIterator<Item = Span<D::Value, T>>
    {
        Groups::new(self.accumulator(), spans.into_iter())
    }

    pub fn driver<T>(&self) -> Driver<D, T> {
        Driver::new(self.domain.clone())
    }

    pub fn feed<T>(&self) -> (Feed<D, T>, FeedSource<D, T>) {
        feed::feed(self.domain.clone(), self.options)
    }

    pub fn first_span<B>(&self, list: &[B]) -> Option<Span<D::Value>>
    where
        B: Bounds<D::Value>,
        D::Value: Clone
    {
        sweep_primitives::first_span(&*self.domain, list)
    }

    pub fn next_span<P, B>(&self, prev: &P, list: &[B]) -> Option<Span<D::Value>>
    where
        P: Bounds<D::Value> + ?Sized,
        B: Bounds<D::Value>,
        D::Value: Clone
    {
        sweep_primitives::next_span(&*self.domain, prev, list)
    }

    pub fn overlap_indexes<P, B>(&self, probe: &P, list: &[B]) -> Vec<usize>
    where
        P: Bounds<D::Value> + ?Sized,
        B: Bounds<D::Value>
    {
        sweep_primitives::overlap_indexes(&*self.domain, probe, list)
    }
}


impl<D> Engine<D>
where
    D: Domain + 'static,
    D::Value: Clone + 'static
{
    /// Source over an in-memory span list, sorted first when
    /// [Options::sort] is set.
    pub fn slice_source<T: 'static>(&self, mut spans: Vec<Span<D::Value, T>>) -> SourceCursor<D, T> {
        if self.options.sort {
            self.sort(&mut spans);
        }
        SourceCursor::new(self.domain.clone(), self.groups(spans))
    }

    /// Source over already consolidated groups.
    pub fn group_source<T, I>(&self, groups: I) -> SourceCursor<D, T>
    where
        I: IntoIterator<Item = ConsolidatedSpan<D::Value, T>>,
        I::IntoIter: 'static
    {
        SourceCursor::new(self.domain.clone(), groups)
    }

    /// Source over spans received from a channel.
    ///
    /// Blocks until the first span arrives or the channel closes.
    pub fn channel_source<T: 'static>(&self, mut receiver: mpsc::Receiver<Span<D::Value, T>>) -> SourceCursor<D, T> {
        let spans = std::iter::from_fn(move || futures::executor::block_on(receiver.recv()));
        SourceCursor::new(self.domain.clone(), self.groups(spans))
    }

    /// Source over groups received from a channel.
    pub fn group_channel_source<T: 'static>(
        &self,
        mut receiver: mpsc::Receiver<ConsolidatedSpan<D::Value, T>>
    ) -> SourceCursor<D, T>
    {
        let groups = std::iter::from_fn(move || futures::executor::block_on(receiver.recv()));
        SourceCursor::new(self.domain.clone(), groups)
    }
}


impl<D> Engine<D>
where
    D: Domain + Send + Sync + 'static,
    D::Value: Clone + Send + 'static
{
    /// Runs a producer thread feeding `spans` into a new source.
    ///
    /// The producer stops as soon as the returned cursor is closed.
    pub fn spawn_feed<T, I>(&self, spans: I) -> (SourceCursor<D, T>, FeedControl, JoinHandle<()>)
    where
        T: Send + 'static,
        I: IntoIterator<Item = Span<D::Value, T>> + Send + 'static
    {
        let (feed, source) = self.feed();
        let control = feed.control().clone();

        let handle = std::thread::spawn(move || {
            let mut feed = scopeguard::guard(feed, |mut feed| feed.finish());
            for span in spans {
                if !feed.can_accumulate(span) {
                    break
                }
            }
        });

        (source.into_cursor(), control, handle)
    }
}

use crate::accumulator::Accumulator;
use crate::cursor::SourceCursor;
use crate::group::ConsolidatedSpan;
use crate::options::Options;
use parking_lot::Mutex;
use std::sync::Arc;
use sweep_primitives::{Domain, Span};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;


#[derive(Default)]
struct FeedState {
    producer_closed: bool,
    consumer_shutdown: bool
}


struct FeedShared {
    cancel: CancellationToken,
    state: Mutex<FeedState>
}


/// Teardown handle shared by the producer and the consumer of a feed.
#[derive(Clone)]
pub struct FeedControl {
    shared: Arc<FeedShared>
}


impl FeedControl {
    fn new() -> Self {
        Self {
            shared: Arc::new(FeedShared {
                cancel: CancellationToken::new(),
                state: Mutex::new(FeedState::default())
            })
        }
    }

    /// Consumer side teardown. Wakes a producer blocked on a full channel.
    ///
    /// Returns `false` if the feed was already shut down.
    pub fn shutdown(&self) -> bool {
        {
            let mut state = self.shared.state.lock();
            if state.consumer_shutdown {
                return false
            }
            state.consumer_shutdown = true;
        }
        self.shared.cancel.cancel();
        debug!("feed shut down by consumer");
        true
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.state.lock().consumer_shutdown
    }

    /// Whether the producer has closed its end of the channel.
    pub fn is_producer_closed(&self) -> bool {
        self.shared.state.lock().producer_closed
    }

    fn mark_producer_closed(&self) -> bool {
        let mut state = self.shared.state.lock();
        !std::mem::replace(&mut state.producer_closed, true)
    }
}


/// Producer half of a channel backed source.
///
/// Spans are accumulated on the producer side and only finished groups
/// cross the channel.
pub struct Feed<D: Domain, T = ()> {
    accumulator: Accumulator<D, T>,
    sender: Option<mpsc::Sender<ConsolidatedSpan<D::Value, T>>>,
    control: FeedControl
}


/// Consumer half of a feed, see [FeedSource::into_cursor].
pub struct FeedSource<D: Domain, T = ()> {
    domain: Arc<D>,
    receiver: mpsc::Receiver<ConsolidatedSpan<D::Value, T>>,
    control: FeedControl
}


pub(crate) fn feed<D: Domain, T>(domain: Arc<D>, options: Options) -> (Feed<D, T>, FeedSource<D, T>) {
    let (sender, receiver) = mpsc::channel(1);
    let control = FeedControl::new();
    let feed = Feed {
        accumulator: Accumulator::new(domain.clone(), options),
        sender: Some(sender),
        control: control.clone()
    };
    let source = FeedSource {
        domain,
        receiver,
        control
    };
    (feed, source)
}


impl<D: Domain, T> Feed<D, T> {
    pub fn control(&self) -> &FeedControl {
        &self.control
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// Publishes `group`, blocking while the channel is full.
    ///
    /// Returns `false` once the consumer is gone or has shut the feed down,
    /// in which case the feed is closed.
    pub fn push(&mut self, group: ConsolidatedSpan<D::Value, T>) -> bool {
        let Some(sender) = self.sender.as_ref() else {
            return false
        };
        let cancel = &self.control.shared.cancel;
        let sent = futures::executor::block_on(async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => false,
                res = sender.send(group) => res.is_ok()
            }
        });
        if !sent {
            debug!("feed consumer is gone, stopping producer");
            self.close_channel();
        }
        sent
    }

    /// Closes the channel, flushing the open group first. Safe to call
    /// any number of times.
    pub fn finish(&mut self) {
        if self.sender.is_none() {
            return
        }
        if let Some(group) = self.accumulator.finish() {
            self.push(group);
        }
        self.close_channel();
    }

    fn close_channel(&mut self) {
        self.sender = None;
        if self.control.mark_producer_closed() {
            debug!(position =? self.accumulator.position(), "feed closed by producer");
        }
    }
}


impl<D: Domain, T> Feed<D, T>
where
    D::Value: Clone
{
    /// Accumulates `span`, publishing the group it finalizes.
    ///
    /// Returns `false` when the producer must stop: the feed is closed, the
    /// consumer shut it down, or `span` failed validation. In the last case
    /// the poisoned group is published before the channel closes.
    pub fn can_accumulate(&mut self, span: Span<D::Value, T>) -> bool {
        if self.is_closed() {
            return false
        }
        if self.control.shared.cancel.is_cancelled() {
            self.close_channel();
            return false
        }
        if let Some(group) = self.accumulator.accumulate(span) {
            if !self.push(group) {
                return false
            }
        }
        if self.accumulator.error().is_some() {
            if let Some(group) = self.accumulator.finish() {
                self.push(group);
            }
            self.close_channel();
            return false
        }
        true
    }
}


impl<D: Domain, T> FeedSource<D, T> {
    pub fn control(&self) -> &FeedControl {
        &self.control
    }
}


impl<D, T> FeedSource<D, T>
where
    D: Domain + 'static,
    D::Value: 'static,
    T: 'static
{
    /// Turns the consumer half into a cursor whose closing shuts the feed
    /// down.
    ///
    /// Blocks until the producer publishes its first group or closes, so
    /// the producer must already be running.
    pub fn into_cursor(self) -> SourceCursor<D, T> {
        let mut receiver = self.receiver;
        let mut cursor = SourceCursor::new(
            self.domain,
            std::iter::from_fn(move || futures::executor::block_on(receiver.recv()))
        );
        let control = self.control;
        cursor.on_close(move || {
            control.shutdown();
        });
        cursor
    }
}

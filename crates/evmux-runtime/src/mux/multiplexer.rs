//! Shared FIFO fanned out to ordered sinks.

use super::{Sink, SinkIndex};
use crate::channel::EventOutlet;
use crate::flag::{EventFlag, SourceBit, SourceKind};
use evmux_event::{Event, EventMask, EventPath, EventStatus, Fetch, WaitMode};
use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Counters reported by [`Multiplexer::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuxStats {
    /// Events handed to a consumer.
    pub delivered: u64,
    /// Events no sink accepted.
    pub dropped: u64,
    /// Events currently queued.
    pub queued: usize,
}

#[derive(Debug)]
struct QueueEntry {
    seq: u64,
    event: Event,
}

/// Routing decision for the entry at the head of the queue.
///
/// Valid only while that entry is still the head; `seq` identifies it.
#[derive(Debug, Clone)]
struct Assignment {
    seq: u64,
    sink: SinkIndex,
    canonical: EventPath,
}

#[derive(Debug, Default)]
struct QueueState {
    entries: VecDeque<QueueEntry>,
    next_seq: u64,
    cached: Option<Assignment>,
}

impl QueueState {
    /// Drops the cached assignment if the head has moved on.
    fn validate_cache(&mut self) {
        let head = self.entries.front().map(|e| e.seq);
        if self.cached.as_ref().is_some_and(|c| Some(c.seq) != head) {
            self.cached = None;
        }
    }
}

/// Event hub: one FIFO queue, many masked consumers.
///
/// Each queued event goes to the first sink, in registration order,
/// whose predicate accepts it. Events no sink accepts are dropped on
/// the next scan. A consumer only ever receives the head of the queue:
/// when the head belongs to someone else it is told
/// [`EventStatus::OutOfSeq`] (or, in `Block` mode, waits for the queue
/// to move).
///
/// ```text
///             ┌──────────────────────────────┐
/// publish ──▶ │ a.1  b.1  a.2  c.1           │ ──▶ head: a.1 → sink:0
///             └──────────────────────────────┘
///                ▲
///                cached {seq, sink, canonical id}
/// ```
///
/// # Example
///
/// ```
/// use evmux_runtime::mux::{MaskSink, Multiplexer};
/// use evmux_event::{Event, EventCategory, EventMask, EventStatus, WaitMode};
///
/// let hub = Multiplexer::standalone("demo");
/// let a = hub.add_sink(MaskSink::new(EventMask::parse("a.*").unwrap()));
/// let b = hub.add_sink(MaskSink::new(EventMask::parse("b.*").unwrap()));
///
/// hub.publish(Event::parse("a.1", EventCategory::Data).unwrap());
///
/// let any = EventMask::any();
/// assert_eq!(hub.has_event(&any, b), EventStatus::OutOfSeq);
/// let got = hub.get_event(&any, WaitMode::NoWait, a).into_event().unwrap();
/// assert_eq!(got.id.as_str(), "a.1");
/// assert_eq!(hub.has_event(&any, a), EventStatus::Wait);
/// ```
pub struct Multiplexer {
    name: String,
    flag: Arc<EventFlag>,
    bit: SourceBit,
    running: AtomicBool,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
    queue: Mutex<QueueState>,
    ready: Condvar,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl Multiplexer {
    /// Creates a running hub on a shared flag.
    ///
    /// The hub registers its own asynchronous bit on `flag`, raised
    /// whenever an event is published.
    #[must_use]
    pub fn new(name: impl Into<String>, flag: Arc<EventFlag>) -> Self {
        let name = name.into();
        let bit = flag.add_source(SourceKind::Asynchronous);
        debug!(hub = %name, %bit, "multiplexer created");
        Self {
            name,
            flag,
            bit,
            running: AtomicBool::new(true),
            sinks: RwLock::new(Vec::new()),
            queue: Mutex::new(QueueState::default()),
            ready: Condvar::new(),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Creates a running hub on a private flag.
    #[must_use]
    pub fn standalone(name: impl Into<String>) -> Self {
        Self::new(name, Arc::new(EventFlag::new()))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The flag this hub raises.
    #[must_use]
    pub fn flag(&self) -> &Arc<EventFlag> {
        &self.flag
    }

    /// The hub's own bit in [`flag`](Self::flag).
    #[must_use]
    pub fn bit(&self) -> SourceBit {
        self.bit
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Appends `sink` to the routing order.
    ///
    /// The returned index is stable for the life of the hub.
    pub fn add_sink<S: Sink + 'static>(&self, sink: S) -> SinkIndex {
        let mut sinks = self.sinks.write();
        let index = SinkIndex(sinks.len());
        sinks.push(Arc::new(sink));
        debug!(hub = %self.name, sink = %index, "sink registered");
        index
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Returns `true` if some sink would accept `id`.
    #[must_use]
    pub fn is_bound(&self, id: &EventPath) -> bool {
        self.route(id).is_some()
    }

    /// Queues `event` and wakes waiters.
    ///
    /// Returns `false`, dropping the event, once the hub is stopped.
    pub fn publish(&self, event: Event) -> bool {
        if !self.is_running() {
            debug!(hub = %self.name, event = %event.id, "publish on stopped hub ignored");
            return false;
        }
        {
            let mut q = self.queue.lock();
            let seq = q.next_seq;
            q.next_seq += 1;
            trace!(hub = %self.name, seq, event = %event.id, "event queued");
            q.entries.push_back(QueueEntry { seq, event });
            self.ready.notify_all();
        }
        self.flag.raise(self.bit);
        true
    }

    /// Raises the hub's bit, waking `Wait`-mode waiters.
    pub fn notify(&self) {
        self.flag.raise(self.bit);
    }

    /// Stops the hub.
    ///
    /// Every blocked waiter wakes and, like every later query, gets
    /// [`EventStatus::Closed`].
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        {
            let _q = self.queue.lock();
            self.ready.notify_all();
        }
        self.flag.raise(self.bit);
        info!(hub = %self.name, "multiplexer stopped");
    }

    /// Reports what [`get_event`](Self::get_event) would return, without
    /// consuming anything.
    ///
    /// Unroutable events at the head are still dropped. `Wait` and
    /// `Block` suspend exactly as the consuming call would, except that
    /// a head already assigned elsewhere by an earlier scan is reported
    /// as `OutOfSeq` immediately in every mode.
    pub fn check_queue(&self, mask: &EventMask, mode: WaitMode, sink: SinkIndex) -> EventStatus {
        self.dispatch(mask, mode, sink, false).status()
    }

    /// Non-blocking probe; `check_queue` in `NoWait` mode.
    pub fn has_event(&self, mask: &EventMask, sink: SinkIndex) -> EventStatus {
        self.check_queue(mask, WaitMode::NoWait, sink)
    }

    /// Takes the head of the queue if it belongs to `sink` and matches
    /// `mask`.
    ///
    /// The delivered event carries the sink's canonical id; its
    /// `address` is the producer's.
    pub fn get_event(&self, mask: &EventMask, mode: WaitMode, sink: SinkIndex) -> Fetch {
        self.dispatch(mask, mode, sink, true)
    }

    #[must_use]
    pub fn stats(&self) -> MuxStats {
        MuxStats {
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            queued: self.queue.lock().entries.len(),
        }
    }

    /// First sink accepting `id`, with its canonical id.
    fn route(&self, id: &EventPath) -> Option<(SinkIndex, EventPath)> {
        self.sinks
            .read()
            .iter()
            .enumerate()
            .find_map(|(i, sink)| sink.accept(id).map(|canonical| (SinkIndex(i), canonical)))
    }

    fn dispatch(&self, mask: &EventMask, mode: WaitMode, sink: SinkIndex, take: bool) -> Fetch {
        let mut q = self.queue.lock();
        // a valid assignment cached before this call scanned answers
        // OUTOFSEQ in every mode; only a fresh scan lets BLOCK wait
        let mut scanned = false;
        loop {
            if !self.is_running() {
                return Fetch::Pending(EventStatus::Closed);
            }
            q.validate_cache();

            if q.entries.is_empty() {
                scanned = true;
                match self.wait_for_entries(&mut q, mode) {
                    Some(status) => return Fetch::Pending(status),
                    None => continue,
                }
            }

            let from_cache = q.cached.is_some() && !scanned;
            scanned = true;
            let assignment = match q.cached.clone() {
                Some(cached) => cached,
                None => {
                    let Some(head) = q.entries.front() else {
                        continue;
                    };
                    let head_seq = head.seq;
                    match self.route(&head.event.id) {
                        Some((owner, canonical)) => {
                            let assignment = Assignment {
                                seq: head_seq,
                                sink: owner,
                                canonical,
                            };
                            q.cached = Some(assignment.clone());
                            assignment
                        }
                        None => {
                            if let Some(entry) = q.entries.pop_front() {
                                self.dropped.fetch_add(1, Ordering::Relaxed);
                                debug!(hub = %self.name, event = %entry.event.id, "unroutable event dropped");
                            }
                            self.ready.notify_all();
                            continue;
                        }
                    }
                }
            };

            if assignment.sink == sink && mask.matches(&assignment.canonical) {
                let entry = if take {
                    q.cached = None;
                    let entry = q.entries.pop_front();
                    self.ready.notify_all();
                    entry.map(|e| e.event)
                } else {
                    q.entries.front().map(|e| e.event.clone())
                };
                let Some(event) = entry else {
                    // the head was checked above under the same lock
                    continue;
                };
                if take {
                    self.delivered.fetch_add(1, Ordering::Relaxed);
                    trace!(hub = %self.name, %sink, event = %assignment.canonical, "event delivered");
                }
                return Fetch::Delivered(Event {
                    id: assignment.canonical,
                    ..event
                });
            }

            trace!(
                hub = %self.name,
                %sink,
                owner = %assignment.sink,
                head = %assignment.canonical,
                "head belongs elsewhere"
            );
            match mode {
                WaitMode::Block if !from_cache => self.ready.wait(&mut q),
                WaitMode::Block | WaitMode::NoWait | WaitMode::Wait => {
                    return Fetch::Pending(EventStatus::OutOfSeq)
                }
            }
        }
    }

    /// Handles an empty queue.
    ///
    /// Returns the status to report, or `None` after a wake-up so the
    /// caller scans again.
    fn wait_for_entries(
        &self,
        q: &mut MutexGuard<'_, QueueState>,
        mode: WaitMode,
    ) -> Option<EventStatus> {
        self.flag.clear(self.bit);

        if self.flag.is_raised() {
            return match mode {
                WaitMode::Block => {
                    self.ready.wait(q);
                    None
                }
                WaitMode::NoWait | WaitMode::Wait => Some(EventStatus::OutOfSeq),
            };
        }

        match mode {
            WaitMode::NoWait => Some(EventStatus::Wait),
            WaitMode::Block => {
                self.ready.wait(q);
                None
            }
            WaitMode::Wait => {
                // any bit on the shared flag wakes us, not only ours
                match MutexGuard::unlocked(q, || self.flag.wait()) {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(hub = %self.name, error = %e, "wait on event flag failed");
                        Some(EventStatus::Error)
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multiplexer")
            .field("name", &self.name)
            .field("bit", &self.bit)
            .field("running", &self.is_running())
            .field("sinks", &self.sink_count())
            .finish_non_exhaustive()
    }
}

impl EventOutlet for Multiplexer {
    fn send(&self, event: Event) -> bool {
        self.publish(event)
    }
}

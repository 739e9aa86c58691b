//! `EventQueue`: virtual clock plus a time-ordered queue of resumptions.
//!
//! Events are ordered by `(due, seq)`.  `seq` is a counter assigned at
//! insertion, so events due at the same instant fire in insertion order and
//! the pop order never depends on heap internals.
//!
//! Cancellation is lazy: [`cancel`][EventQueue::cancel] drops the event's
//! sequence id from the pending set and the heap entry is discarded when it
//! reaches the top.  A cancelled event therefore never fires and never
//! counts towards [`len`][EventQueue::len].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use resto_core::SimTime;
use tracing::trace;

use crate::{DesError, DesResult, Set};

/// Identifies a scheduled event for cancellation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct EventHandle {
    seq: u64,
    due: SimTime,
}

impl EventHandle {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn due(&self) -> SimTime {
        self.due
    }
}

/// A popped event.
#[derive(Debug)]
pub struct Event<T> {
    pub due:     SimTime,
    pub seq:     u64,
    pub payload: T,
}

/// Heap entry; reversed so `BinaryHeap` (a max-heap) pops the earliest.
struct Scheduled<T>(Event<T>);

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .due
            .cmp(&self.0.due)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

/// The virtual clock and its pending events.
pub struct EventQueue<T> {
    now:      SimTime,
    next_seq: u64,
    heap:     BinaryHeap<Scheduled<T>>,
    /// Sequence ids of events that are scheduled, not fired, not cancelled.
    pending:  Set<u64>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            now:      SimTime::ZERO,
            next_seq: 0,
            heap:     BinaryHeap::new(),
            pending:  Set::default(),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time: the due time of the last popped event.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of live (not fired, not cancelled) events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `payload` to fire `delay` time units from now.
    ///
    /// `delay` may be `+∞` (the event is kept but never fires); NaN and
    /// negative delays are rejected.
    pub fn schedule(&mut self, delay: f64, payload: T) -> DesResult<EventHandle> {
        if delay.is_nan() || delay < 0.0 {
            return Err(DesError::InvalidDelay(delay));
        }
        let due = self.now + delay;
        Ok(self.push(due, payload))
    }

    /// Schedule `payload` at the absolute time `due`, which must not be in
    /// the past.
    pub fn schedule_at(&mut self, due: SimTime, payload: T) -> DesResult<EventHandle> {
        if due.as_f64().is_nan() || due < self.now {
            return Err(DesError::EventInPast { due, now: self.now });
        }
        Ok(self.push(due, payload))
    }

    /// Cancel a not-yet-fired event.
    ///
    /// Returns `false` if the event already fired or was already cancelled;
    /// neither case is an error.
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        let removed = self.pending.remove(&handle.seq);
        if removed {
            trace!(seq = handle.seq, due = handle.due.as_f64(), "event cancelled");
        }
        removed
    }

    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.pending.contains(&handle.seq)
    }

    /// Due time of the earliest live event, if any.
    pub fn next_due(&mut self) -> Option<SimTime> {
        self.discard_cancelled();
        self.heap.peek().map(|s| s.0.due)
    }

    /// Pop the earliest live event if it is due at or before `horizon`, and
    /// advance the clock to its due time.
    ///
    /// Events due at `+∞` never pop.
    ///
    /// # Errors
    /// [`DesError::EventInPast`] if the earliest event is due before the
    /// current clock.  `schedule`/`schedule_at` make this unreachable; it is
    /// checked anyway because a clock running backwards would silently
    /// corrupt every statistic downstream.
    pub fn pop_due(&mut self, horizon: SimTime) -> DesResult<Option<Event<T>>> {
        self.discard_cancelled();
        let due = match self.heap.peek() {
            None => return Ok(None),
            Some(top) => top.0.due,
        };
        if due > horizon || !due.is_finite() {
            return Ok(None);
        }
        let Some(Scheduled(event)) = self.heap.pop() else {
            return Ok(None);
        };
        self.pending.remove(&event.seq);
        if event.due < self.now {
            return Err(DesError::EventInPast { due: event.due, now: self.now });
        }
        self.now = event.due;
        Ok(Some(event))
    }

    /// Pop and fire events in `(due, seq)` order until the queue is empty or
    /// the next event is due after `horizon`.  `fire` may schedule further
    /// events.  Returns the number of events fired.
    pub fn run_until<F>(&mut self, horizon: SimTime, mut fire: F) -> DesResult<u64>
    where
        F: FnMut(&mut Self, T) -> DesResult<()>,
    {
        let mut fired = 0;
        while let Some(event) = self.pop_due(horizon)? {
            fire(self, event.payload)?;
            fired += 1;
        }
        Ok(fired)
    }

    fn push(&mut self, due: SimTime, payload: T) -> EventHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(seq);
        self.heap.push(Scheduled(Event { due, seq, payload }));
        EventHandle { seq, due }
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.pending.contains(&top.0.seq) {
                break;
            }
            self.heap.pop();
        }
    }
}

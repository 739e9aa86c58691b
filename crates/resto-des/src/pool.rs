//! `ResourcePool`: capacity-bounded, strictly FIFO contention primitive.
//!
//! Invariants, checked on every mutation:
//!
//! - `0 ≤ held ≤ capacity`, and `held` equals the sum of per-process holdings.
//! - Waiters are granted strictly in enqueue order.  A later request is never
//!   granted ahead of an earlier one, even when only the later one would fit.
//!   A new request that would fit is still queued if anyone is waiting.
//! - A process can only release what it was granted.
//!
//! The pool never resumes anybody itself: `release`/`withdraw` return the
//! `(process, amount)` pairs they granted and the scheduler wakes them.

use std::collections::{BTreeMap, VecDeque};

use resto_core::{PoolId, ProcessId, SimTime};

use crate::{DesError, DesResult};

/// Result of a blocking [`ResourcePool::request`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RequestOutcome {
    /// Units were free and nobody was waiting: the request holds them now.
    Granted,
    /// The requester was appended to the wait queue.
    Queued,
}

/// A queued request.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Waiter {
    pub process:     ProcessId,
    pub amount:      u32,
    pub enqueued_at: SimTime,
}

/// Usage figures for one pool, computed up to a given time.
#[derive(Clone, PartialEq, Debug)]
pub struct PoolReport {
    pub name:             String,
    pub capacity:         u32,
    /// Total grants, immediate and queued.
    pub grants:           u64,
    /// Grants that had to wait in the queue first.
    pub queued_grants:    u64,
    /// Mean time a queued grant spent waiting (0 if none waited).
    pub mean_queue_delay: f64,
    pub max_queue_len:    usize,
    /// Busy unit-time divided by `capacity × elapsed` (0 for an empty span
    /// or a zero-capacity pool).
    pub utilisation:      f64,
}

pub struct ResourcePool {
    id:       PoolId,
    name:     String,
    capacity: u32,
    held:     u32,
    holders:  BTreeMap<ProcessId, u32>,
    waiters:  VecDeque<Waiter>,

    // ── usage accounting ──
    grants:            u64,
    queued_grants:     u64,
    total_queue_delay: f64,
    max_queue_len:     usize,
    busy_time:         f64,
    last_change:       SimTime,
}

impl ResourcePool {
    pub fn new(id: PoolId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            held: 0,
            holders: BTreeMap::new(),
            waiters: VecDeque::new(),
            grants: 0,
            queued_grants: 0,
            total_queue_delay: 0.0,
            max_queue_len: 0,
            busy_time: 0.0,
            last_change: SimTime::ZERO,
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units currently granted.
    pub fn held(&self) -> u32 {
        self.held
    }

    pub fn available(&self) -> u32 {
        self.capacity - self.held
    }

    /// Units currently held by `process`.
    pub fn held_by(&self, process: ProcessId) -> u32 {
        self.holders.get(&process).copied().unwrap_or(0)
    }

    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }

    /// Waiters in grant order.
    pub fn waiters(&self) -> impl Iterator<Item = &Waiter> {
        self.waiters.iter()
    }

    /// Request `amount` units, granting immediately or queueing at the tail.
    ///
    /// # Errors
    /// - [`DesError::ExceedsCapacity`] if `amount > capacity`: such a request
    ///   could never be granted, so it is refused instead of queued.
    /// - [`DesError::ZeroAmount`] for `amount == 0`.
    pub fn request(
        &mut self,
        process: ProcessId,
        amount:  u32,
        now:     SimTime,
    ) -> DesResult<RequestOutcome> {
        self.check_amount(process, amount)?;
        if amount > self.capacity {
            return Err(DesError::ExceedsCapacity {
                pool:      self.id,
                requested: amount,
                capacity:  self.capacity,
            });
        }
        if self.waiters.is_empty() && self.fits(amount) {
            self.grant(process, amount, now);
            return Ok(RequestOutcome::Granted);
        }
        self.waiters.push_back(Waiter { process, amount, enqueued_at: now });
        self.max_queue_len = self.max_queue_len.max(self.waiters.len());
        Ok(RequestOutcome::Queued)
    }

    /// Grant `amount` units only if that can happen right now without
    /// overtaking a waiter.  Never queues; returns whether it granted.
    ///
    /// Used for admission control, so a request larger than the capacity is
    /// simply refused rather than treated as a fault.
    pub fn try_request(&mut self, process: ProcessId, amount: u32, now: SimTime) -> DesResult<bool> {
        self.check_amount(process, amount)?;
        if self.waiters.is_empty() && self.fits(amount) {
            self.grant(process, amount, now);
            return Ok(true);
        }
        Ok(false)
    }

    /// Release `amount` units held by `process`, then grant waiters from the
    /// head of the queue for as long as the head fits.
    ///
    /// # Errors
    /// [`DesError::OverRelease`] if `process` holds fewer than `amount` units.
    pub fn release(
        &mut self,
        process: ProcessId,
        amount:  u32,
        now:     SimTime,
    ) -> DesResult<Vec<(ProcessId, u32)>> {
        self.check_amount(process, amount)?;
        let held = self.held_by(process);
        if amount > held {
            return Err(DesError::OverRelease { pool: self.id, process, amount, held });
        }
        self.accrue(now);
        self.held -= amount;
        if held == amount {
            self.holders.remove(&process);
        } else {
            self.holders.insert(process, held - amount);
        }
        Ok(self.grant_waiters(now))
    }

    /// Remove every queued request of `process` (it is going away).
    ///
    /// Removing the head may unblock the requests behind it, so this can
    /// grant too.
    pub fn withdraw(&mut self, process: ProcessId, now: SimTime) -> Vec<(ProcessId, u32)> {
        let before = self.waiters.len();
        self.waiters.retain(|w| w.process != process);
        if self.waiters.len() == before {
            return Vec::new();
        }
        self.grant_waiters(now)
    }

    /// Usage figures from time zero up to `now`.
    pub fn report(&self, now: SimTime) -> PoolReport {
        let span = now.as_f64();
        let busy = self.busy_time
            + self.held as f64 * now.since(self.last_change).max(0.0);
        let utilisation = if self.capacity == 0 || span <= 0.0 || !span.is_finite() {
            0.0
        } else {
            busy / (self.capacity as f64 * span)
        };
        let mean_queue_delay = if self.queued_grants == 0 {
            0.0
        } else {
            self.total_queue_delay / self.queued_grants as f64
        };
        PoolReport {
            name: self.name.clone(),
            capacity: self.capacity,
            grants: self.grants,
            queued_grants: self.queued_grants,
            mean_queue_delay,
            max_queue_len: self.max_queue_len,
            utilisation,
        }
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn check_amount(&self, process: ProcessId, amount: u32) -> DesResult<()> {
        if amount == 0 {
            return Err(DesError::ZeroAmount { pool: self.id, process });
        }
        Ok(())
    }

    #[inline]
    fn fits(&self, amount: u32) -> bool {
        amount <= self.capacity - self.held
    }

    fn grant(&mut self, process: ProcessId, amount: u32, now: SimTime) {
        self.accrue(now);
        self.held += amount;
        *self.holders.entry(process).or_insert(0) += amount;
        self.grants += 1;
        debug_assert!(self.held <= self.capacity);
    }

    /// Strict FIFO: stop at the first head that does not fit.
    fn grant_waiters(&mut self, now: SimTime) -> Vec<(ProcessId, u32)> {
        let mut granted = Vec::new();
        while let Some(head) = self.waiters.front().copied() {
            if !self.fits(head.amount) {
                break;
            }
            self.waiters.pop_front();
            self.grant(head.process, head.amount, now);
            self.queued_grants += 1;
            self.total_queue_delay += now.since(head.enqueued_at);
            granted.push((head.process, head.amount));
        }
        granted
    }

    /// Integrate `held` over time for utilisation.
    fn accrue(&mut self, now: SimTime) {
        if now > self.last_change {
            self.busy_time += self.held as f64 * now.since(self.last_change);
            self.last_change = now;
        }
    }
}

//! `Scheduler<W>`: the process table driven by the event queue.

use resto_core::{PoolId, ProcessId, SimTime};
use tracing::{debug, trace, warn};

use crate::process::Effect;
use crate::{
    Context, DesError, DesResult, EventHandle, EventQueue, Map, Process, ProcessState,
    RequestOutcome, ResourcePool, Yield,
};

/// One entry of the process table.
struct Slot<W> {
    /// `None` only while the process is running its step.
    process: Option<Box<dyn Process<W>>>,
    name:    &'static str,
    state:   ProcessState,
    /// The queued resumption (timer, grant wake-up, or first start), if any.
    pending: Option<EventHandle>,
}

/// Drives processes over a world `W`.
///
/// The scheduler owns the clock, the pools, and every live process.  The
/// world is passed into [`run_until`][Self::run_until]/[`step`][Self::step]
/// so the caller keeps ownership of model state between runs.
///
/// Every resumption goes through the event queue, including grants that
/// happen immediately and freshly spawned processes, so all work at one
/// instant runs in `(due, seq)` order.
pub struct Scheduler<W> {
    queue:          EventQueue<ProcessId>,
    pools:          Vec<ResourcePool>,
    table:          Map<ProcessId, Slot<W>>,
    next_pid:       ProcessId,
    fired:          u64,
    cleanup_faults: u64,
}

impl<W> Default for Scheduler<W> {
    fn default() -> Self {
        Self {
            queue:          EventQueue::new(),
            pools:          Vec::new(),
            table:          Map::default(),
            next_pid:       ProcessId(0),
            fired:          0,
            cleanup_faults: 0,
        }
    }
}

impl<W> Scheduler<W> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn pool(&self, id: PoolId) -> DesResult<&ResourcePool> {
        self.pools.get(id.index()).ok_or(DesError::UnknownPool(id))
    }

    pub fn pools(&self) -> &[ResourcePool] {
        &self.pools
    }

    /// State of `pid`; `None` for an id that was never handed out.
    pub fn state(&self, pid: ProcessId) -> Option<ProcessState> {
        match self.table.get(&pid) {
            Some(slot) => Some(slot.state),
            None if pid < self.next_pid => Some(ProcessState::Terminated),
            None => None,
        }
    }

    /// Number of processes that have not terminated.
    pub fn live_processes(&self) -> usize {
        self.table.len()
    }

    /// Number of live queued events.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the next live event.
    pub fn next_due(&mut self) -> Option<SimTime> {
        self.queue.next_due()
    }

    /// Events fired since the scheduler was created.
    pub fn events_fired(&self) -> u64 {
        self.fired
    }

    /// How many times a process exited while still holding units.
    pub fn cleanup_faults(&self) -> u64 {
        self.cleanup_faults
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    /// Register a pool and return its id.
    ///
    /// Fails once every id below the `PoolId::INVALID` sentinel is taken.
    pub fn add_pool(&mut self, name: impl Into<String>, capacity: u32) -> DesResult<PoolId> {
        let id = match u16::try_from(self.pools.len()) {
            Ok(raw) if raw != PoolId::INVALID.0 => PoolId(raw),
            _ => return Err(DesError::TooManyPools(self.pools.len())),
        };
        self.pools.push(ResourcePool::new(id, name, capacity));
        Ok(id)
    }

    /// Start `process` at the current instant.
    pub fn spawn<P: Process<W> + 'static>(&mut self, process: P) -> DesResult<ProcessId> {
        let pid = self.next_pid;
        self.next_pid = pid.next();
        self.start(pid, Box::new(process))?;
        Ok(pid)
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Fire events until the queue is empty or the next event is due after
    /// `horizon`.  Returns the number of events fired.
    ///
    /// Any fault aborts the run immediately.
    pub fn run_until(&mut self, horizon: SimTime, world: &mut W) -> DesResult<u64> {
        let mut fired = 0;
        while self.step(horizon, world)? {
            fired += 1;
        }
        Ok(fired)
    }

    /// Fire the next event if it is due at or before `horizon`.
    /// Returns `false` when there was nothing to fire.
    pub fn step(&mut self, horizon: SimTime, world: &mut W) -> DesResult<bool> {
        let Some(event) = self.queue.pop_due(horizon)? else {
            return Ok(false);
        };
        self.fired += 1;
        self.resume(event.payload, world)?;
        Ok(true)
    }

    /// Remove a live process: cancel its queued resumption, withdraw it from
    /// pool queues, and release whatever it holds.
    pub fn terminate(&mut self, pid: ProcessId) -> DesResult<()> {
        let slot = self.table.remove(&pid).ok_or(DesError::UnknownProcess(pid))?;
        if let Some(handle) = slot.pending {
            self.queue.cancel(handle);
        }
        let now = self.now();
        let mut effects = Vec::new();
        self.reclaim(pid, now, false, &mut effects)?;
        debug!(pid = pid.0, kind = slot.name, now = now.as_f64(), "process terminated");
        self.apply(effects)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn start(&mut self, pid: ProcessId, process: Box<dyn Process<W>>) -> DesResult<()> {
        let handle = self.queue.schedule(0.0, pid)?;
        let kind = process.name();
        debug!(pid = pid.0, kind, now = self.now().as_f64(), "process spawned");
        self.table.insert(
            pid,
            Slot {
                process: Some(process),
                name: kind,
                state: ProcessState::Runnable,
                pending: Some(handle),
            },
        );
        Ok(())
    }

    fn resume(&mut self, pid: ProcessId, world: &mut W) -> DesResult<()> {
        let now = self.now();
        let slot = self.table.get_mut(&pid).ok_or(DesError::UnknownProcess(pid))?;
        slot.state = ProcessState::Runnable;
        slot.pending = None;
        let mut process = slot.process.take().ok_or(DesError::UnknownProcess(pid))?;
        trace!(pid = pid.0, kind = slot.name, now = now.as_f64(), "resume");

        let mut effects = Vec::new();
        let yielded = {
            let mut cx = Context {
                pid,
                now,
                pools: &mut self.pools,
                effects: &mut effects,
                next_pid: &mut self.next_pid,
                world,
            };
            process.resume(&mut cx)?
        };

        match yielded {
            Yield::Timeout(delay) => {
                let handle = self.queue.schedule(delay, pid)?;
                self.suspend(pid, process, Some(handle))?;
            }
            Yield::Acquire { pool, amount } => {
                let outcome = self
                    .pools
                    .get_mut(pool.index())
                    .ok_or(DesError::UnknownPool(pool))?
                    .request(pid, amount, now)?;
                let handle = match outcome {
                    RequestOutcome::Granted => Some(self.queue.schedule(0.0, pid)?),
                    RequestOutcome::Queued => {
                        trace!(pid = pid.0, pool = pool.0, amount, "queued");
                        None
                    }
                };
                self.suspend(pid, process, handle)?;
            }
            Yield::Exit => {
                let kind = process.name();
                self.table.remove(&pid);
                self.reclaim(pid, now, true, &mut effects)?;
                trace!(pid = pid.0, kind, now = now.as_f64(), "process exited");
            }
        }

        self.apply(effects)
    }

    fn suspend(
        &mut self,
        pid:     ProcessId,
        process: Box<dyn Process<W>>,
        pending: Option<EventHandle>,
    ) -> DesResult<()> {
        let slot = self.table.get_mut(&pid).ok_or(DesError::UnknownProcess(pid))?;
        slot.process = Some(process);
        slot.state = ProcessState::Waiting;
        slot.pending = pending;
        Ok(())
    }

    /// Give back everything `pid` holds or waits for.  With `fault` set, any
    /// holdings found are logged as a protocol fault.
    fn reclaim(
        &mut self,
        pid:     ProcessId,
        now:     SimTime,
        fault:   bool,
        effects: &mut Vec<Effect<W>>,
    ) -> DesResult<()> {
        for pool in &mut self.pools {
            let granted = pool.withdraw(pid, now);
            effects.extend(granted.into_iter().map(|(p, _)| Effect::Wake(p)));

            let held = pool.held_by(pid);
            if held == 0 {
                continue;
            }
            if fault {
                self.cleanup_faults += 1;
                warn!(
                    pid = pid.0,
                    pool = pool.name(),
                    held,
                    "process exited while holding units; releasing them"
                );
            }
            let granted = pool.release(pid, held, now)?;
            effects.extend(granted.into_iter().map(|(p, _)| Effect::Wake(p)));
        }
        Ok(())
    }

    fn apply(&mut self, effects: Vec<Effect<W>>) -> DesResult<()> {
        for effect in effects {
            match effect {
                Effect::Wake(pid) => {
                    let handle = self.queue.schedule(0.0, pid)?;
                    if let Some(slot) = self.table.get_mut(&pid) {
                        slot.pending = Some(handle);
                        debug!(pid = pid.0, now = self.queue.now().as_f64(), "granted");
                    } else {
                        self.queue.cancel(handle);
                    }
                }
                Effect::Start(pid, process) => self.start(pid, process)?,
            }
        }
        Ok(())
    }
}

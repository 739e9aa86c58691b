//! The `Process` trait: a suspendable unit of simulated behavior.
//!
//! A process is an explicit state machine.  The scheduler calls
//! [`Process::resume`] each time the process is due; the process does all the
//! work of one virtual instant and returns a [`Yield`] naming its next
//! suspension point.  Nothing is preempted mid-step.

use resto_core::{PoolId, ProcessId, SimTime};

use crate::{DesError, DesResult, ResourcePool};

/// Lifecycle state of a process in the scheduler's table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ProcessState {
    /// Due to run (freshly spawned, or its timer fired / grant arrived).
    Runnable,
    /// Suspended on a timer or a pool request.
    Waiting,
    /// Finished or terminated; no longer in the table.
    Terminated,
}

/// What a process waits for after a step.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Yield {
    /// Resume after `delay` time units.
    Timeout(f64),
    /// Resume once `amount` units of `pool` are granted.
    Acquire { pool: PoolId, amount: u32 },
    /// The process is done.  Anything it still holds is reclaimed and
    /// reported as a fault.
    Exit,
}

/// Pluggable process behavior over a world type `W`.
///
/// # Example
///
/// ```rust,ignore
/// struct Blink { on: bool }
///
/// impl Process<()> for Blink {
///     fn resume(&mut self, _cx: &mut Context<'_, ()>) -> DesResult<Yield> {
///         self.on = !self.on;
///         Ok(Yield::Timeout(1.0))
///     }
/// }
/// ```
pub trait Process<W> {
    /// Run one step at `cx.now()` and say where to suspend next.
    fn resume(&mut self, cx: &mut Context<'_, W>) -> DesResult<Yield>;

    /// Short label used in log lines.
    fn name(&self) -> &'static str {
        "process"
    }
}

/// Deferred consequences of a step, applied by the scheduler in call order
/// once the step returns.
pub(crate) enum Effect<W> {
    /// A pool granted this waiter; resume it at `now`.
    Wake(ProcessId),
    /// Start a freshly spawned process at `now`.
    Start(ProcessId, Box<dyn Process<W>>),
}

/// Everything a process may touch during one step.
pub struct Context<'a, W> {
    pub(crate) pid:      ProcessId,
    pub(crate) now:      SimTime,
    pub(crate) pools:    &'a mut [ResourcePool],
    pub(crate) effects:  &'a mut Vec<Effect<W>>,
    pub(crate) next_pid: &'a mut ProcessId,

    /// Model state shared by every process of the run.
    pub world: &'a mut W,
}

impl<W> Context<'_, W> {
    /// The running process.
    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn pool(&self, id: PoolId) -> DesResult<&ResourcePool> {
        self.pools.get(id.index()).ok_or(DesError::UnknownPool(id))
    }

    /// Units of `pool` held by the running process.
    pub fn held(&self, pool: PoolId) -> u32 {
        self.pools.get(pool.index()).map_or(0, |p| p.held_by(self.pid))
    }

    /// Release units of `pool`.  Releasing never suspends; waiters that
    /// become grantable are resumed after this step, in grant order.
    pub fn release(&mut self, pool: PoolId, amount: u32) -> DesResult<()> {
        let (pid, now) = (self.pid, self.now);
        let granted = self
            .pools
            .get_mut(pool.index())
            .ok_or(DesError::UnknownPool(pool))?
            .release(pid, amount, now)?;
        self.effects
            .extend(granted.into_iter().map(|(p, _)| Effect::Wake(p)));
        Ok(())
    }

    /// Non-blocking acquire; see [`ResourcePool::try_request`].
    pub fn try_acquire(&mut self, pool: PoolId, amount: u32) -> DesResult<bool> {
        let (pid, now) = (self.pid, self.now);
        self.pools
            .get_mut(pool.index())
            .ok_or(DesError::UnknownPool(pool))?
            .try_request(pid, amount, now)
    }

    /// Spawn a new process.  It first runs at the current instant, after
    /// every event already queued for this instant.
    pub fn spawn<P: Process<W> + 'static>(&mut self, process: P) -> ProcessId {
        let pid = *self.next_pid;
        *self.next_pid = pid.next();
        self.effects.push(Effect::Start(pid, Box::new(process)));
        pid
    }
}

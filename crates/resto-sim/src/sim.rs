//! The `Sim` struct and its run loop.

use std::collections::VecDeque;

use resto_core::{ProcessId, Sampler, SimTime};
use resto_des::{ProcessState, Scheduler};
use resto_model::{Restaurant, Roster, StatsSnapshot, Transition};
use tracing::{debug, info};

use crate::{RestaurantConfig, SimObserver, SimResult};

// ── Phases ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Phase {
    /// Generators live; events up to the horizon fire.
    Running,
    /// Generators stopped; in-flight entities finish.
    Draining,
    Finished,
}

/// What one call to `advance` did.
enum Progress {
    Fired,
    Horizon(SimTime),
    Done,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// A run has two parts:
///
/// 1. **Arrivals**: events up to and including the horizon fire; both
///    generators create entities.
/// 2. **Drain** (when `drain_after_horizon` is set): the generators are
///    terminated and the remaining events fire until every entity is
///    `Served` or `Balked`.
///
/// Without drain the run stops at the horizon and unfinished entities are
/// reported as `pending_count`.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S> {
    pub config: RestaurantConfig,
    horizon:    SimTime,
    scheduler:  Scheduler<Restaurant<S>>,
    world:      Restaurant<S>,
    generators: [ProcessId; 2],
    phase:      Phase,
}

impl<S: Sampler> Sim<S> {
    pub(crate) fn new(
        horizon:    SimTime,
        config:     RestaurantConfig,
        scheduler:  Scheduler<Restaurant<S>>,
        world:      Restaurant<S>,
        generators: [ProcessId; 2],
    ) -> Self {
        Self { config, horizon, scheduler, world, generators, phase: Phase::Running }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run to completion and return the final statistics.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StatsSnapshot> {
        info!(
            seed    = self.config.random_seed,
            horizon = self.horizon.as_f64(),
            drain   = self.config.drain_after_horizon,
            "simulation started"
        );
        while self.step(observer)? {}

        let stats = self.snapshot();
        observer.on_sim_end(&stats);
        info!(
            generated = stats.generated_count,
            served    = stats.served_count,
            balked    = stats.balked_count,
            pending   = stats.pending_count,
            avg_wait  = stats.average_wait,
            events    = self.scheduler.events_fired(),
            "simulation finished"
        );
        Ok(stats)
    }

    /// Fire one event (or cross the horizon) and report its transitions.
    /// Returns `false` once the run is over.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        match self.advance()? {
            Progress::Fired => {
                for t in self.world.drain_transitions() {
                    observer.on_transition(&t);
                }
                Ok(true)
            }
            Progress::Horizon(at) => {
                observer.on_horizon(at);
                Ok(true)
            }
            Progress::Done => Ok(false),
        }
    }

    /// Lazily advance the run, yielding transitions as they happen.
    ///
    /// The iterator ends when the run does; a fault is yielded once as
    /// `Err` and then the iterator ends.
    pub fn transitions(&mut self) -> Transitions<'_, S> {
        Transitions { sim: self, buffer: VecDeque::new(), failed: false }
    }

    /// Statistics so far, with per-pool reports.  Does not disturb the run.
    pub fn snapshot(&self) -> StatsSnapshot {
        let end = self.elapsed_to();
        let pools = self.scheduler.pools().iter().map(|p| p.report(end)).collect();
        self.world.stats.snapshot().with_pools(pools)
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn roster(&self) -> &Roster {
        &self.world.roster
    }

    pub fn world(&self) -> &Restaurant<S> {
        &self.world
    }

    pub fn scheduler(&self) -> &Scheduler<Restaurant<S>> {
        &self.scheduler
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn advance(&mut self) -> SimResult<Progress> {
        match self.phase {
            Phase::Running => {
                if self.scheduler.step(self.horizon, &mut self.world)? {
                    return Ok(Progress::Fired);
                }
                self.stop_generators()?;
                self.phase = if self.config.drain_after_horizon {
                    Phase::Draining
                } else {
                    Phase::Finished
                };
                debug!(
                    horizon   = self.horizon.as_f64(),
                    in_flight = self.world.stats.snapshot().pending_count,
                    "horizon reached"
                );
                Ok(Progress::Horizon(self.horizon))
            }
            Phase::Draining => {
                if self.scheduler.step(SimTime::NEVER, &mut self.world)? {
                    return Ok(Progress::Fired);
                }
                self.phase = Phase::Finished;
                Ok(Progress::Done)
            }
            Phase::Finished => Ok(Progress::Done),
        }
    }

    fn stop_generators(&mut self) -> SimResult<()> {
        for pid in self.generators {
            if matches!(
                self.scheduler.state(pid),
                Some(ProcessState::Runnable | ProcessState::Waiting)
            ) {
                self.scheduler.terminate(pid)?;
            }
        }
        Ok(())
    }

    /// End of the span pool utilisation is measured over.
    fn elapsed_to(&self) -> SimTime {
        match self.phase {
            Phase::Running => self.scheduler.now(),
            Phase::Draining | Phase::Finished => self.scheduler.now().max(self.horizon),
        }
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

/// Iterator returned by [`Sim::transitions`].
pub struct Transitions<'a, S> {
    sim:    &'a mut Sim<S>,
    buffer: VecDeque<Transition>,
    failed: bool,
}

impl<S: Sampler> Iterator for Transitions<'_, S> {
    type Item = SimResult<Transition>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(t) = self.buffer.pop_front() {
                return Some(Ok(t));
            }
            if self.failed {
                return None;
            }
            match self.sim.advance() {
                Ok(Progress::Fired) => self.buffer.extend(self.sim.world.drain_transitions()),
                Ok(Progress::Horizon(_)) => {}
                Ok(Progress::Done) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

//! `Restaurant<S>`: the world every process of a run shares.

use resto_core::{EntityId, PoolId, Sampler, SimTime};

use crate::{Channel, ModelResult, Roster, Stage, StatsAccumulator, Transition};

/// Pool ids of the restaurant's shared resources.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Layout {
    /// Cooking stations, shared by both channels.
    pub kitchen: PoolId,
    /// Wait staff, dine-in only.
    pub servers: PoolId,
    /// Table slots (one per party), dine-in admission control.
    pub tables:  PoolId,
}

/// Duration parameters of the lifecycle.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Timing {
    /// Cooking time per unit of entity size.
    pub cook_time:         f64,
    /// Mean service time per guest; service is exponential with mean
    /// `base_service_time × party size`.
    pub base_service_time: f64,
    /// Mean of the exponential order-taking hold.
    pub order_time:        f64,
}

/// Model state: the roster, statistics, sampler, and pending transitions.
pub struct Restaurant<S> {
    pub layout:  Layout,
    pub timing:  Timing,
    pub roster:  Roster,
    pub stats:   StatsAccumulator,
    pub sampler: S,
    transitions: Vec<Transition>,
}

impl<S: Sampler> Restaurant<S> {
    pub fn new(layout: Layout, timing: Timing, sampler: S) -> Self {
        Self {
            layout,
            timing,
            roster: Roster::new(),
            stats: StatsAccumulator::new(),
            sampler,
            transitions: Vec::new(),
        }
    }

    /// Create and count a new entity arriving at `now`.
    pub fn admit(&mut self, channel: Channel, size: u32, now: SimTime) -> EntityId {
        self.stats.record_arrival(channel);
        self.roster.admit(channel, size, now)
    }

    /// Mark `id` served and record it.  Returns the wait time.
    pub fn serve(&mut self, id: EntityId, now: SimTime) -> ModelResult<f64> {
        let wait = self.roster.serve(id, now)?;
        self.stats.record(self.roster.get(id)?)?;
        Ok(wait)
    }

    /// Mark `id` balked and record it.
    pub fn balk(&mut self, id: EntityId) -> ModelResult<()> {
        self.roster.balk(id)?;
        self.stats.record(self.roster.get(id)?)
    }

    /// Append to the transition stream.
    pub fn emit(&mut self, entity: EntityId, channel: Channel, stage: Stage, time: SimTime) {
        self.transitions.push(Transition { entity, channel, stage, time });
    }

    /// Take the transitions emitted since the last drain, oldest first.
    pub fn drain_transitions(&mut self) -> std::vec::Drain<'_, Transition> {
        self.transitions.drain(..)
    }

    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }
}

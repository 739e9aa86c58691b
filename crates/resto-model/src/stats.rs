//! Wait-time and outcome statistics.
//!
//! Conventions:
//! - `average_wait` and `max_wait` are `0.0` when nothing has been served.
//! - `balk_rate` is `balked / generated`, `0.0` when nothing was generated.
//! - Waits are measured from seating (dine-in) or arrival (takeout) to
//!   departure.

use std::collections::HashSet;

use resto_core::EntityId;
use resto_des::PoolReport;

use crate::{Channel, Entity, ModelError, ModelResult, Outcome};

/// Per-channel slice of a [`StatsSnapshot`].
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ChannelStats {
    pub generated:    u64,
    pub served:       u64,
    pub balked:       u64,
    pub average_wait: f64,
}

/// Read-only summary of a run, at the end or at any point mid-run.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StatsSnapshot {
    pub generated_count: u64,
    pub served_count:    u64,
    pub balked_count:    u64,
    /// Generated but not yet `Served` or `Balked`.
    pub pending_count:   u64,
    pub average_wait:    f64,
    pub max_wait:        f64,
    pub balk_rate:       f64,
    pub dine_in:         ChannelStats,
    pub takeout:         ChannelStats,
    /// Filled in by the simulation runner; empty straight from the accumulator.
    pub pools:           Vec<PoolReport>,
}

impl StatsSnapshot {
    pub fn with_pools(mut self, pools: Vec<PoolReport>) -> Self {
        self.pools = pools;
        self
    }

    pub fn channel(&self, channel: Channel) -> &ChannelStats {
        match channel {
            Channel::DineIn => &self.dine_in,
            Channel::Takeout => &self.takeout,
        }
    }
}

/// Append-only accumulator fed by the lifecycle.
#[derive(Default, Debug)]
pub struct StatsAccumulator {
    generated:         [u64; 2],
    served:            [u64; 2],
    balked:            [u64; 2],
    wait_sum:          [f64; 2],
    wait_time_samples: Vec<f64>,
    recorded:          HashSet<EntityId>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a newly generated entity.
    pub fn record_arrival(&mut self, channel: Channel) {
        self.generated[channel.index()] += 1;
    }

    /// Record an entity's terminal outcome.  Each entity is recorded once.
    pub fn record(&mut self, entity: &Entity) -> ModelResult<()> {
        let c = entity.channel().index();
        match entity.outcome() {
            Outcome::Pending => return Err(ModelError::NotTerminal(entity.id)),
            Outcome::Served => {
                let wait = entity.wait_time().ok_or(ModelError::NotTerminal(entity.id))?;
                if !self.recorded.insert(entity.id) {
                    return Err(ModelError::DuplicateRecord(entity.id));
                }
                self.served[c] += 1;
                self.wait_sum[c] += wait;
                self.wait_time_samples.push(wait);
            }
            Outcome::Balked => {
                if !self.recorded.insert(entity.id) {
                    return Err(ModelError::DuplicateRecord(entity.id));
                }
                self.balked[c] += 1;
            }
        }
        Ok(())
    }

    /// Wait samples in the order entities were served.
    pub fn wait_time_samples(&self) -> &[f64] {
        &self.wait_time_samples
    }

    pub fn served_count(&self) -> u64 {
        self.served.iter().sum()
    }

    pub fn balked_count(&self) -> u64 {
        self.balked.iter().sum()
    }

    pub fn generated_count(&self) -> u64 {
        self.generated.iter().sum()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let generated = self.generated_count();
        let served = self.served_count();
        let balked = self.balked_count();
        let n = self.wait_time_samples.len();
        let average_wait = if n == 0 {
            0.0
        } else {
            self.wait_time_samples.iter().sum::<f64>() / n as f64
        };
        let max_wait = self.wait_time_samples.iter().copied().fold(0.0, f64::max);
        let balk_rate = if generated == 0 { 0.0 } else { balked as f64 / generated as f64 };

        StatsSnapshot {
            generated_count: generated,
            served_count: served,
            balked_count: balked,
            pending_count: generated.saturating_sub(served + balked),
            average_wait,
            max_wait,
            balk_rate,
            dine_in: self.channel_stats(Channel::DineIn),
            takeout: self.channel_stats(Channel::Takeout),
            pools: Vec::new(),
        }
    }

    fn channel_stats(&self, channel: Channel) -> ChannelStats {
        let c = channel.index();
        ChannelStats {
            generated:    self.generated[c],
            served:       self.served[c],
            balked:       self.balked[c],
            average_wait: if self.served[c] == 0 {
                0.0
            } else {
                self.wait_sum[c] / self.served[c] as f64
            },
        }
    }
}

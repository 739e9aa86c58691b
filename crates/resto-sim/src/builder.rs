//! Fluent builder for constructing a [`Sim`].

use resto_core::{Sampler, SimRng, SimTime};
use resto_des::Scheduler;
use resto_model::{ArrivalGenerator, Channel, Layout, Restaurant, Timing};
use tracing::debug;

use crate::{RestaurantConfig, Sim, SimResult};

/// Fluent builder for [`Sim<S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                   |
/// |-----------------|-------------------------------------------|
/// | `.sampler(s)`   | `SimRng::new(config.random_seed)`         |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(RestaurantConfig::default()).build()?;
/// let stats = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S = SimRng> {
    config:  RestaurantConfig,
    sampler: S,
}

impl SimBuilder<SimRng> {
    pub fn new(config: RestaurantConfig) -> Self {
        let sampler = SimRng::new(config.random_seed);
        Self { config, sampler }
    }
}

impl<S: Sampler> SimBuilder<S> {
    /// Replace the seeded sampler, e.g. with a
    /// [`FixedSampler`][resto_core::FixedSampler] for hand-checked scenarios.
    pub fn sampler<T: Sampler>(self, sampler: T) -> SimBuilder<T> {
        SimBuilder { config: self.config, sampler }
    }

    /// Validate the configuration, create the pools, and start both
    /// generators.
    pub fn build(self) -> SimResult<Sim<S>> {
        self.config.validate()?;
        let c = &self.config;

        // ── Pools ─────────────────────────────────────────────────────────
        let mut scheduler = Scheduler::new();
        let layout = Layout {
            kitchen: scheduler.add_pool("kitchen", c.num_cooks)?,
            servers: scheduler.add_pool("servers", c.num_servers)?,
            tables:  scheduler.add_pool("tables", c.num_tables)?,
        };
        let timing = Timing {
            cook_time:         c.cook_time,
            base_service_time: c.base_service_rate,
            order_time:        c.service_rate,
        };
        let world = Restaurant::new(layout, timing, self.sampler);

        // ── Generators ────────────────────────────────────────────────────
        let dine_in = scheduler.spawn(ArrivalGenerator::new(
            Channel::DineIn,
            c.dinein_arrival_rate,
            c.dinein_party_size,
        ))?;
        let takeout = scheduler.spawn(ArrivalGenerator::new(
            Channel::Takeout,
            c.takeout_arrival_rate,
            c.takeout_order_size,
        ))?;
        debug!(seed = c.random_seed, "simulation built");

        Ok(Sim::new(
            SimTime(c.simulation_duration),
            self.config,
            scheduler,
            world,
            [dine_in, takeout],
        ))
    }
}

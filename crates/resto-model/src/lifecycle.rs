//! `Lifecycle`: the per-entity state machine.
//!
//! Each entity is driven by exactly one `Lifecycle` process.  The process
//! stores the stage it is suspended in; on resume it finishes that stage's
//! work and moves on.  Every pool it acquires is released explicitly before
//! it exits.

use resto_core::{EntityId, Sampler};
use resto_des::{Context, DesResult, Process, Yield};
use tracing::debug;

use crate::{Channel, Entity, ModelError, Restaurant, Stage};

pub struct Lifecycle {
    entity:  EntityId,
    channel: Channel,
    size:    u32,
    stage:   Stage,
}

impl Lifecycle {
    pub fn new(entity: &Entity) -> Self {
        Self {
            entity:  entity.id,
            channel: entity.channel(),
            size:    entity.size,
            stage:   Stage::Arrived,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter<S: Sampler>(&mut self, cx: &mut Context<'_, Restaurant<S>>, stage: Stage) {
        self.stage = stage;
        let now = cx.now();
        cx.world.emit(self.entity, self.channel, stage, now);
    }

    /// `Arrived` (+ `TableCheck`) → `Ordering`, or → `Balked`.
    fn arrive<S: Sampler>(&mut self, cx: &mut Context<'_, Restaurant<S>>) -> DesResult<Yield> {
        self.enter(cx, Stage::Arrived);

        if self.channel == Channel::DineIn {
            self.enter(cx, Stage::TableCheck);
            let tables = cx.world.layout.tables;
            if !cx.try_acquire(tables, 1)? {
                cx.world.balk(self.entity)?;
                self.enter(cx, Stage::Balked);
                debug!(entity = self.entity.0, now = cx.now().as_f64(), "party balked: no table");
                return Ok(Yield::Exit);
            }
            let now = cx.now();
            cx.world.roster.seat(self.entity, now)?;
        }

        self.enter(cx, Stage::Ordering);
        let mean = cx.world.timing.order_time;
        Ok(Yield::Timeout(cx.world.sampler.exponential(mean)))
    }

    fn depart<S: Sampler>(&mut self, cx: &mut Context<'_, Restaurant<S>>) -> DesResult<Yield> {
        if self.channel == Channel::DineIn {
            let tables = cx.world.layout.tables;
            cx.release(tables, 1)?;
        }
        let now = cx.now();
        cx.world.serve(self.entity, now)?;
        self.enter(cx, Stage::Departed);
        Ok(Yield::Exit)
    }
}

impl<S: Sampler> Process<Restaurant<S>> for Lifecycle {
    fn resume(&mut self, cx: &mut Context<'_, Restaurant<S>>) -> DesResult<Yield> {
        match self.stage {
            Stage::Arrived => self.arrive(cx),

            Stage::Ordering => {
                self.enter(cx, Stage::QueuedKitchen);
                Ok(Yield::Acquire { pool: cx.world.layout.kitchen, amount: 1 })
            }

            // The station was granted.
            Stage::QueuedKitchen => {
                self.enter(cx, Stage::Cooking);
                Ok(Yield::Timeout(cx.world.timing.cook_time * self.size as f64))
            }

            Stage::Cooking => {
                let kitchen = cx.world.layout.kitchen;
                cx.release(kitchen, 1)?;
                match self.channel {
                    Channel::DineIn => {
                        self.enter(cx, Stage::ServiceWait);
                        Ok(Yield::Acquire { pool: cx.world.layout.servers, amount: 1 })
                    }
                    Channel::Takeout => self.depart(cx),
                }
            }

            // A server was granted.
            Stage::ServiceWait => {
                self.enter(cx, Stage::InService);
                let mean = cx.world.timing.base_service_time * self.size as f64;
                Ok(Yield::Timeout(cx.world.sampler.exponential(mean)))
            }

            Stage::InService => {
                let servers = cx.world.layout.servers;
                cx.release(servers, 1)?;
                self.depart(cx)
            }

            stage @ (Stage::TableCheck | Stage::Departed | Stage::Balked) => {
                Err(ModelError::UnexpectedResume { entity: self.entity, stage }.into())
            }
        }
    }

    fn name(&self) -> &'static str {
        match self.channel {
            Channel::DineIn => "dine-in",
            Channel::Takeout => "takeout",
        }
    }
}

//! Lifecycle stages and the transition records emitted on each change.

use resto_core::{EntityId, SimTime};

use crate::Channel;

/// Where an entity is in its lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Arrived,
    /// Dine-in only: admission control against the table pool.
    TableCheck,
    /// Order-taking hold before the kitchen.
    Ordering,
    QueuedKitchen,
    Cooking,
    /// Dine-in only.
    ServiceWait,
    /// Dine-in only.
    InService,
    Departed,
    Balked,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Arrived => "arrived",
            Stage::TableCheck => "table_check",
            Stage::Ordering => "ordering",
            Stage::QueuedKitchen => "queued_kitchen",
            Stage::Cooking => "cooking",
            Stage::ServiceWait => "service_wait",
            Stage::InService => "in_service",
            Stage::Departed => "departed",
            Stage::Balked => "balked",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Departed | Stage::Balked)
    }
}

/// One entry of the event stream: `entity` entered `stage` at `time`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub entity:  EntityId,
    pub channel: Channel,
    pub stage:   Stage,
    pub time:    SimTime,
}

//! Customers and takeout orders.

use resto_core::{EntityId, SimTime};

use crate::{ModelError, ModelResult};

/// How an entity reached the restaurant.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    DineIn,
    Takeout,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::DineIn => "dine_in",
            Channel::Takeout => "takeout",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Channel-specific state.  Only a dine-in party has a table, so only it
/// carries a seating time.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    DineIn { wait_start: Option<SimTime> },
    Takeout,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Pending,
    Served,
    Balked,
}

/// A dine-in party or a takeout order.
///
/// `size` is the party size (dine-in) or the item count (takeout).  Once
/// `outcome` leaves `Pending` the entity is frozen; every mutator refuses.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id:           EntityId,
    pub arrival_time: SimTime,
    pub size:         u32,
    kind:             EntityKind,
    wait_time:        Option<f64>,
    outcome:          Outcome,
}

impl Entity {
    pub fn new(id: EntityId, channel: Channel, arrival_time: SimTime, size: u32) -> Self {
        let kind = match channel {
            Channel::DineIn => EntityKind::DineIn { wait_start: None },
            Channel::Takeout => EntityKind::Takeout,
        };
        Self { id, arrival_time, size, kind, wait_time: None, outcome: Outcome::Pending }
    }

    pub fn channel(&self) -> Channel {
        match self.kind {
            EntityKind::DineIn { .. } => Channel::DineIn,
            EntityKind::Takeout => Channel::Takeout,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// When a dine-in party was seated; `None` for takeout and unseated parties.
    pub fn wait_start(&self) -> Option<SimTime> {
        match self.kind {
            EntityKind::DineIn { wait_start } => wait_start,
            EntityKind::Takeout => None,
        }
    }

    pub fn wait_time(&self) -> Option<f64> {
        self.wait_time
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Pending
    }

    pub(crate) fn seat(&mut self, now: SimTime) -> ModelResult<()> {
        self.ensure_pending()?;
        match &mut self.kind {
            EntityKind::DineIn { wait_start: slot @ None } => {
                *slot = Some(now);
                Ok(())
            }
            _ => Err(ModelError::NotSeated(self.id)),
        }
    }

    /// Mark served at `now`.  Dine-in waits count from seating, takeout
    /// waits from arrival.
    pub(crate) fn serve(&mut self, now: SimTime) -> ModelResult<f64> {
        self.ensure_pending()?;
        let start = match self.kind {
            EntityKind::DineIn { wait_start: Some(t) } => t,
            EntityKind::DineIn { wait_start: None } => return Err(ModelError::NotSeated(self.id)),
            EntityKind::Takeout => self.arrival_time,
        };
        let wait = now.since(start);
        self.wait_time = Some(wait);
        self.outcome = Outcome::Served;
        Ok(wait)
    }

    pub(crate) fn balk(&mut self) -> ModelResult<()> {
        self.ensure_pending()?;
        self.outcome = Outcome::Balked;
        Ok(())
    }

    fn ensure_pending(&self) -> ModelResult<()> {
        if self.is_terminal() {
            return Err(ModelError::AlreadyTerminal { entity: self.id, outcome: self.outcome });
        }
        Ok(())
    }
}

//! `Roster`: every entity created during a run.

use resto_core::{EntityId, SimTime};

use crate::{Channel, Entity, ModelError, ModelResult};

/// Append-only entity table indexed by `EntityId`.
///
/// Entities are only ever mutated through the roster's lifecycle operations
/// (`seat`, `serve`, `balk`), never handed out mutably.
#[derive(Default, Debug)]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity arriving at `now`.
    pub fn admit(&mut self, channel: Channel, size: u32, now: SimTime) -> EntityId {
        let id = EntityId(self.entities.len() as u64);
        self.entities.push(Entity::new(id, channel, now, size));
        id
    }

    pub fn get(&self, id: EntityId) -> ModelResult<&Entity> {
        self.entities.get(id.index()).ok_or(ModelError::UnknownEntity(id))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn seat(&mut self, id: EntityId, now: SimTime) -> ModelResult<()> {
        self.get_mut(id)?.seat(now)
    }

    pub fn serve(&mut self, id: EntityId, now: SimTime) -> ModelResult<f64> {
        self.get_mut(id)?.serve(now)
    }

    pub fn balk(&mut self, id: EntityId) -> ModelResult<()> {
        self.get_mut(id)?.balk()
    }

    fn get_mut(&mut self, id: EntityId) -> ModelResult<&mut Entity> {
        self.entities.get_mut(id.index()).ok_or(ModelError::UnknownEntity(id))
    }
}

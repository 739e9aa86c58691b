use resto_core::EntityId;
use resto_des::DesError;
use thiserror::Error;

use crate::{Outcome, Stage};

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("{0} is not in the roster")]
    UnknownEntity(EntityId),

    #[error("{entity} already ended as {outcome:?}")]
    AlreadyTerminal { entity: EntityId, outcome: Outcome },

    #[error("{0} has no terminal outcome yet")]
    NotTerminal(EntityId),

    #[error("{0} was already recorded")]
    DuplicateRecord(EntityId),

    #[error("{0} is not a seated dine-in party")]
    NotSeated(EntityId),

    #[error("{entity} resumed in stage {stage:?}, which never suspends")]
    UnexpectedResume { entity: EntityId, stage: Stage },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<ModelError> for DesError {
    fn from(e: ModelError) -> Self {
        DesError::Process(Box::new(e))
    }
}

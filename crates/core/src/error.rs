//! Contract violations surfaced by generation, population and turn resolution.
//! Probabilistic "nothing spawned" outcomes and combat misses are not errors.

use thiserror::Error;

use crate::types::EntityId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("entity {0:?} is dead and cannot act or be acted upon")]
    DeadEntity(EntityId),

    #[error("entity {0:?} does not exist on this map")]
    UnknownEntity(EntityId),

    #[error("map has no player")]
    MissingPlayer,

    #[error("the run has already finished")]
    RunFinished,

    #[error("level {level} is outside 1..={max}")]
    InvalidLevel { level: u32, max: u32 },

    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    #[error("generation produced no rooms; there is no valid start position")]
    NoRooms,

    #[error("unknown record tag '{0}'")]
    UnknownRecordTag(String),

    #[error("record '{tag}' cannot be restored: {reason}")]
    InvalidRecord { tag: String, reason: &'static str },
}

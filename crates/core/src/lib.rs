pub mod config;
pub mod content;
pub mod entity;
pub mod error;
pub mod game;
pub mod journal;
pub mod mapgen;
pub mod persist;
pub mod render;
pub mod replay;
pub mod rng;
pub mod state;
pub mod types;

pub use config::{GenerationConfig, MAX_LEVEL, STARTING_LEVEL, SpawnConfig};
pub use entity::Entity;
pub use error::CoreError;
pub use game::{Game, TrapHook, TurnReport};
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use mapgen::{Level, LevelGenerator, generate, populate};
pub use persist::{LevelSnapshot, Record, restore, snapshot};
pub use render::{MessageLog, NullRenderer, Renderer};
pub use replay::*;
pub use rng::RandomSource;
pub use state::GameMap;
pub use types::*;

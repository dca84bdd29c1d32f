//! Serializable input journal: the generation request plus every player
//! input, enough to rebuild a session exactly.

use serde::{Deserialize, Serialize};

use crate::config::{GenerationConfig, SpawnConfig};
use crate::types::Direction;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub generation: GenerationConfig,
    pub spawn: SpawnConfig,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPayload {
    Move { direction: Direction },
    ChangeLevel { level_number: u32 },
}

impl InputJournal {
    pub fn new(generation: GenerationConfig, spawn: SpawnConfig) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: env!("CARGO_PKG_VERSION").to_string(),
            generation,
            spawn,
            inputs: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.generation.seed
    }

    pub fn next_seq(&self) -> u64 {
        self.inputs.len() as u64
    }

    pub fn append(&mut self, payload: InputPayload) {
        let seq = self.next_seq();
        self.inputs.push(InputRecord { seq, payload });
    }

    pub fn append_move(&mut self, direction: Direction) {
        self.append(InputPayload::Move { direction });
    }

    pub fn append_level_change(&mut self, level_number: u32) {
        self.append(InputPayload::ChangeLevel { level_number });
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

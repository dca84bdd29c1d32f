//! Generation and spawn-scaling configuration.
//! Both structs are plain serde records so front ends can load them from files.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Deepest level; reaching it places the win-condition item.
pub const MAX_LEVEL: u32 = 10;
pub const STARTING_LEVEL: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub map_width: usize,
    pub map_height: usize,
    pub min_room_size: usize,
    pub max_room_size: usize,
    pub min_partition_size: usize,
    pub max_depth: u32,
    pub seed: u64,
    pub level_number: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 45,
            min_room_size: 5,
            max_room_size: 15,
            min_partition_size: 10,
            max_depth: 5,
            seed: 1234,
            level_number: STARTING_LEVEL,
        }
    }
}

impl GenerationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_level(mut self, level_number: u32) -> Self {
        self.level_number = level_number;
        self
    }

    /// Rejects requests that cannot describe any level. Room sizes larger
    /// than a partition are not rejected; they only yield sparse levels.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(STARTING_LEVEL..=MAX_LEVEL).contains(&self.level_number) {
            return Err(CoreError::InvalidLevel { level: self.level_number, max: MAX_LEVEL });
        }
        if self.map_width < 3 || self.map_height < 3 {
            return Err(CoreError::InvalidConfig(format!(
                "map must be at least 3x3, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.min_room_size < 3 {
            return Err(CoreError::InvalidConfig(format!(
                "min_room_size must be at least 3, got {}",
                self.min_room_size
            )));
        }
        if self.max_room_size < self.min_room_size {
            return Err(CoreError::InvalidConfig(format!(
                "max_room_size {} is below min_room_size {}",
                self.max_room_size, self.min_room_size
            )));
        }
        if self.min_partition_size == 0 {
            return Err(CoreError::InvalidConfig("min_partition_size must be positive".into()));
        }
        Ok(())
    }
}

/// Highest rate depth scaling alone can push a trap or enemy roll to.
const DEPTH_RATE_CAP: f64 = 0.9;

/// Depth-scaling policy for loot, traps and enemies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Chance that a non-spawn room gets its 0..=`max_loot_per_room` item rolls.
    pub loot_rate: f64,
    pub max_loot_per_room: usize,
    pub trap_rate: f64,
    pub enemy_rate: f64,
    pub max_enemies_per_room: usize,
    pub sleep_rate: f64,
    /// Added to `trap_rate` and `enemy_rate` per level below the first.
    pub trap_rate_per_level: f64,
    pub enemy_rate_per_level: f64,
    /// Extra spawn weight per level of depth beyond a kind's minimum level.
    pub depth_weight_per_level: u32,
    pub poison_trap_min_level: u32,
    pub teleport_trap_min_level: u32,
    pub terminal_level: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            loot_rate: 1.0,
            max_loot_per_room: 3,
            trap_rate: 0.15,
            enemy_rate: 0.45,
            max_enemies_per_room: 3,
            sleep_rate: 0.5,
            trap_rate_per_level: 0.03,
            enemy_rate_per_level: 0.03,
            depth_weight_per_level: 2,
            poison_trap_min_level: 3,
            teleport_trap_min_level: 5,
            terminal_level: MAX_LEVEL,
        }
    }
}

impl SpawnConfig {
    /// Derives the table used for one level. Depth growth stops at
    /// `DEPTH_RATE_CAP`; a configured base rate above it is kept as is.
    pub fn for_level(&self, level_number: u32) -> Self {
        let depth = f64::from(level_number.saturating_sub(STARTING_LEVEL));
        let scaled =
            |base: f64, per_level: f64| base.max((base + depth * per_level).min(DEPTH_RATE_CAP));
        Self {
            trap_rate: scaled(self.trap_rate, self.trap_rate_per_level),
            enemy_rate: scaled(self.enemy_rate, self.enemy_rate_per_level),
            ..self.clone()
        }
    }

    pub fn is_terminal(&self, level_number: u32) -> bool {
        level_number >= self.terminal_level
    }
}

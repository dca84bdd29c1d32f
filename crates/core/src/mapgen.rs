//! Procedural level generation: partition, place rooms, connect, rasterize,
//! then populate.

pub mod corridors;
pub mod model;
pub mod partition;
pub mod populate;
pub mod raster;
pub mod rooms;

pub use model::{Difficulty, Hallway, Level, Room};
pub use populate::{PopulationSummary, populate};

use crate::config::{GenerationConfig, SpawnConfig};
use crate::error::CoreError;
use crate::rng::RandomSource;
use crate::state::GameMap;
use crate::types::Pos;

use corridors::connect_rooms;
use partition::{PartitionBounds, build_partition_tree};
use raster::rasterize;
use rooms::{RoomBounds, place_rooms};

/// Structure-only generation from a fresh stream for `(seed, level_number)`.
pub fn generate(config: &GenerationConfig) -> Result<Level, CoreError> {
    let mut rng = RandomSource::for_level(config.seed, config.level_number);
    generate_with(config, &mut rng)
}

/// Structure-only generation drawing from a caller-supplied stream.
/// A zero-room result is an error: the level would have no start position.
pub fn generate_with(config: &GenerationConfig, rng: &mut RandomSource) -> Result<Level, CoreError> {
    config.validate()?;

    let mut tree = build_partition_tree(
        Pos::default(),
        config.map_width,
        config.map_height,
        PartitionBounds { max_depth: config.max_depth, min_size: config.min_partition_size },
        rng,
    );
    let rooms = place_rooms(
        &mut tree,
        RoomBounds { min_size: config.min_room_size, max_size: config.max_room_size },
        rng,
    );
    log::debug!(
        "level {} seed {}: {} partitions, {} rooms",
        config.level_number,
        config.seed,
        tree.leaf_count(),
        rooms.len()
    );
    if rooms.is_empty() {
        return Err(CoreError::NoRooms);
    }
    if rooms.len() < tree.leaf_count() {
        log::debug!("{} partitions too small for a room", tree.leaf_count() - rooms.len());
    }

    let hallways = connect_rooms(&tree, &rooms, rng);
    let mut map = GameMap::new(config.map_width, config.map_height);
    map.rooms = rooms;
    map.hallways = hallways;
    rasterize(&mut map);

    Ok(Level {
        map,
        level_number: config.level_number,
        difficulty: Difficulty::for_level(config.level_number),
    })
}

/// Builds complete levels: one stream per `(seed, level)` covers both the
/// structure and the population.
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    config: GenerationConfig,
    spawn: SpawnConfig,
}

impl LevelGenerator {
    pub fn new(config: GenerationConfig, spawn: SpawnConfig) -> Self {
        Self { config, spawn }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn spawn_config(&self) -> &SpawnConfig {
        &self.spawn
    }

    pub fn generate(&self, level_number: u32) -> Result<Level, CoreError> {
        let config = self.config.clone().with_level(level_number);
        let mut rng = RandomSource::for_level(config.seed, level_number);
        let mut level = generate_with(&config, &mut rng)?;
        populate(&mut level.map, level_number, &self.spawn.for_level(level_number), &mut rng);
        Ok(level)
    }
}

//! Session state for one run: the current level, the player on it, and the
//! event journal. Turn resolution, combat and enemy behavior live in the
//! submodules and extend `Game` from there.

use crate::config::{GenerationConfig, MAX_LEVEL, STARTING_LEVEL, SpawnConfig};
use crate::content::{Item, TrapKind};
use crate::entity::Entity;
use crate::error::CoreError;
use crate::mapgen::{Level, LevelGenerator};
use crate::render::Renderer;
use crate::rng::{RandomSource, TURN_STREAM, derive_level_seed, mix_seed_stream};
use crate::state::GameMap;
use crate::types::*;

mod behavior;
mod combat;
mod hash;
mod movement;
mod turn;

#[cfg(test)]
mod test_support;

pub use behavior::{WAKE_RADIUS, next_step};
pub use combat::{AttackOutcome, attack, attack_damage};
pub use movement::{MoveResult, move_entity};

/// Called when the player steps on a trap. The core only reveals and reports
/// traps; effects belong to the hook.
pub trait TrapHook {
    fn on_trap(&mut self, map: &mut GameMap, player: EntityId, pos: Pos, kind: TrapKind);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackRecord {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: i32,
    pub killed: bool,
}

/// What one call to [`Game::execute_turn`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: u64,
    pub moved: bool,
    pub attacks: Vec<AttackRecord>,
    pub picked_up: Option<Item>,
    pub trap: Option<(Pos, TrapKind)>,
    pub reached_stairs: bool,
    pub enemies_woken: usize,
    pub outcome: Option<RunOutcome>,
}

pub struct Game {
    seed: u64,
    generation: GenerationConfig,
    spawn: SpawnConfig,
    level: Level,
    turn: u64,
    log: Vec<LogEvent>,
    outcome: Option<RunOutcome>,
    trap_hook: Option<Box<dyn TrapHook>>,
}

impl Game {
    /// Builds the configured level and places a fresh player on its start.
    pub fn start(generation: GenerationConfig, spawn: SpawnConfig) -> Result<Self, CoreError> {
        let generator = LevelGenerator::new(generation.clone(), spawn.clone());
        let mut level = generator.generate(generation.level_number)?;
        level.map.spawn_player(Entity::player(level.map.start));
        Self::from_level(generation, spawn, level, 0)
    }

    /// Resumes on an already-built level. The map must hold a player.
    pub fn from_level(
        generation: GenerationConfig,
        spawn: SpawnConfig,
        level: Level,
        turn: u64,
    ) -> Result<Self, CoreError> {
        level.map.player_id()?;
        Ok(Self {
            seed: generation.seed,
            generation: generation.with_level(level.level_number),
            spawn,
            level,
            turn,
            log: Vec::new(),
            outcome: None,
            trap_hook: None,
        })
    }

    pub fn set_trap_hook(&mut self, hook: Box<dyn TrapHook>) {
        self.trap_hook = Some(hook);
    }

    /// Replaces the current level with a freshly generated level `level_number`,
    /// carrying the player's stats and inventory over to its start.
    pub fn change_level(
        &mut self,
        level_number: u32,
        renderer: &mut impl Renderer,
    ) -> Result<(), CoreError> {
        if self.outcome.is_some() {
            return Err(CoreError::RunFinished);
        }
        if !(STARTING_LEVEL..=MAX_LEVEL).contains(&level_number) {
            return Err(CoreError::InvalidLevel { level: level_number, max: MAX_LEVEL });
        }
        let player = self.player()?.clone();
        if !player.alive {
            return Err(CoreError::DeadEntity(player.id));
        }

        let generator = LevelGenerator::new(self.generation.clone(), self.spawn.clone());
        let mut level = generator.generate(level_number)?;
        let start = level.map.start;
        level.map.spawn_player(Entity { pos: start, ..player });

        log::debug!("player moved to level {level_number}");
        self.level = level;
        self.generation.level_number = level_number;
        self.log.push(LogEvent::LevelChanged { level_number });

        renderer.init_for_map(&self.level.map);
        renderer.display_message(&format!("You arrive on level {level_number}."));
        let player = self.player()?;
        renderer.update_status(player);
        renderer.render_all(&self.level.map, player);
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn level_number(&self) -> u32 {
        self.level.level_number
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn map(&self) -> &GameMap {
        &self.level.map
    }

    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.level.map
    }

    pub fn player(&self) -> Result<&Entity, CoreError> {
        self.level.map.player()
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation
    }

    pub fn spawn_config(&self) -> &SpawnConfig {
        &self.spawn
    }

    pub fn current_turn(&self) -> u64 {
        self.turn
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Each turn draws from its own stream, keyed by level and turn number,
    /// so a restored session continues exactly where the saved one stopped.
    fn turn_rng(&self) -> RandomSource {
        let level_seed = derive_level_seed(self.seed, self.level.level_number, TURN_STREAM);
        RandomSource::from_seed(mix_seed_stream(level_seed, self.turn))
    }

    fn finish(&mut self, outcome: RunOutcome, renderer: &mut impl Renderer) {
        self.outcome = Some(outcome);
        self.log.push(LogEvent::Finished(outcome));
        renderer.display_message(match outcome {
            RunOutcome::Victory => "You escape with the Amulet of Yendor!",
            RunOutcome::Defeat => "You die...",
        });
    }
}

//! Flat save records. A level is restored by regenerating its structure from
//! `(seed, level_number)` and overlaying the recorded entities, items and
//! traps; population is never replayed.

use serde::{Deserialize, Serialize};

use crate::config::{GenerationConfig, SpawnConfig};
use crate::content::{EnemyKind, Item, ItemKind, Trap, TrapKind};
use crate::entity::Entity;
use crate::error::CoreError;
use crate::game::Game;
use crate::mapgen::{Level, generate};
use crate::state::GameMap;
use crate::types::{EntityId, Pos, TileKind};

const PLAYER_TAG: &str = "player";
const ASLEEP_TAG: &str = "asleep";
const ITEM_PREFIX: &str = "item";
const DROP_PREFIX: &str = "drop";
const INVENTORY_PREFIX: &str = "inventory";
const TRAP_PREFIX: &str = "trap";

/// One entity, item or trap. `value` is life for actors, the amount or bonus
/// for items and the revealed flag for traps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub tag: String,
    pub pos: Option<Pos>,
    pub name: String,
    pub value: i64,
}

impl Record {
    fn new(tag: impl Into<String>, pos: Option<Pos>, name: impl Into<String>, value: i64) -> Self {
        Self { tag: tag.into(), pos, name: name.into(), value }
    }

    fn item(prefix: &str, pos: Option<Pos>, item: &Item) -> Self {
        Self::new(format!("{prefix}:{}", item.kind.tag()), pos, item.name.clone(), i64::from(item.value))
    }

    fn to_item(&self, kind_tag: &str) -> Result<Item, CoreError> {
        let kind = ItemKind::from_tag(kind_tag).ok_or_else(|| self.unknown())?;
        Ok(Item { kind, name: self.name.clone(), value: self.value_i32() })
    }

    fn value_i32(&self) -> i32 {
        self.value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    fn unknown(&self) -> CoreError {
        CoreError::UnknownRecordTag(self.tag.clone())
    }

    fn invalid(&self, reason: &'static str) -> CoreError {
        CoreError::InvalidRecord { tag: self.tag.clone(), reason }
    }
}

/// Player progress that does not fit a flat record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub experience: u32,
    pub gold: i32,
    pub max_life: i32,
    pub attack: i32,
    pub armor_class: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub seed: u64,
    pub level_number: u32,
    pub turn: u64,
    pub player: PlayerStats,
    pub records: Vec<Record>,
}

impl LevelSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Captures the living entities, floor items and traps of the current level.
pub fn snapshot(game: &Game) -> Result<LevelSnapshot, CoreError> {
    let map = game.map();
    let player = map.player()?;
    let mut records = Vec::new();

    records.push(Record::new(PLAYER_TAG, Some(player.pos), player.name.clone(), i64::from(player.life)));
    for item in &player.inventory {
        records.push(Record::item(INVENTORY_PREFIX, None, item));
    }

    for id in map.living_enemy_ids() {
        let enemy = &map.entities[id];
        records.push(Record::new(enemy.tag(), Some(enemy.pos), enemy.name.clone(), i64::from(enemy.life)));
        if enemy.asleep {
            records.push(Record::new(ASLEEP_TAG, Some(enemy.pos), "", 1));
        }
        if let Some(item) = &enemy.drop {
            records.push(Record::item(DROP_PREFIX, Some(enemy.pos), item));
        }
    }

    for (&pos, item) in &map.items {
        records.push(Record::item(ITEM_PREFIX, Some(pos), item));
    }
    for (&pos, trap) in &map.traps {
        records.push(Record::new(
            format!("{TRAP_PREFIX}:{}", trap.kind.tag()),
            Some(pos),
            trap.kind.name(),
            i64::from(trap.revealed),
        ));
    }

    Ok(LevelSnapshot {
        seed: game.seed(),
        level_number: game.level_number(),
        turn: game.current_turn(),
        player: PlayerStats {
            level: player.level,
            experience: player.experience,
            gold: player.gold,
            max_life: player.max_life,
            attack: player.attack,
            armor_class: player.armor_class,
        },
        records,
    })
}

/// Regenerates the snapshot's level structure and overlays its records.
pub fn restore(
    generation: &GenerationConfig,
    spawn: &SpawnConfig,
    snapshot: &LevelSnapshot,
) -> Result<Game, CoreError> {
    let config = generation.clone().with_seed(snapshot.seed).with_level(snapshot.level_number);
    let mut level = generate(&config)?;
    overlay(&mut level, snapshot)?;
    log::debug!(
        "restored level {} of seed {} with {} records",
        snapshot.level_number,
        snapshot.seed,
        snapshot.records.len()
    );
    Game::from_level(config, spawn.clone(), level, snapshot.turn)
}

fn overlay(level: &mut Level, snapshot: &LevelSnapshot) -> Result<(), CoreError> {
    let level_number = level.level_number;
    let map = &mut level.map;
    let mut player = None;

    for record in &snapshot.records {
        match record.tag.split_once(':') {
            Some((INVENTORY_PREFIX, kind)) => {
                let item = record.to_item(kind)?;
                let id = player.ok_or(CoreError::MissingPlayer)?;
                map.entities[id].inventory.push(item);
            }
            Some((ITEM_PREFIX, kind)) => {
                let item = record.to_item(kind)?;
                let pos = walkable_pos(map, record)?;
                if !map.place_item(pos, item) {
                    return Err(record.invalid("another item already lies there"));
                }
            }
            Some((DROP_PREFIX, kind)) => {
                let item = record.to_item(kind)?;
                let id = enemy_at(map, required_pos(record)?, record)?;
                map.entities[id].drop = Some(item);
            }
            Some((TRAP_PREFIX, kind)) => {
                let kind = TrapKind::from_tag(kind).ok_or_else(|| record.unknown())?;
                let pos = required_pos(record)?;
                if map.tile_at(pos) != TileKind::Floor {
                    return Err(record.invalid("traps sit on plain floor"));
                }
                map.place_trap(pos, Trap { kind, revealed: record.value != 0 });
            }
            Some(_) => return Err(record.unknown()),
            None if record.tag == PLAYER_TAG => {
                if player.is_some() {
                    return Err(record.invalid("more than one player"));
                }
                player = Some(restore_player(map, record, &snapshot.player)?);
            }
            None if record.tag == ASLEEP_TAG => {
                let id = enemy_at(map, required_pos(record)?, record)?;
                map.entities[id].asleep = true;
            }
            None => {
                let kind = EnemyKind::from_tag(&record.tag).ok_or_else(|| record.unknown())?;
                let pos = free_actor_pos(map, record)?;
                let mut enemy = Entity::enemy(kind, level_number, pos);
                enemy.name = record.name.clone();
                enemy.life = record.value_i32().clamp(1, enemy.max_life.max(1));
                map.spawn(enemy);
            }
        }
    }

    map.player_id()?;
    Ok(())
}

fn restore_player(map: &mut GameMap, record: &Record, stats: &PlayerStats) -> Result<EntityId, CoreError> {
    if stats.max_life < 1 {
        return Err(record.invalid("player max life is below 1"));
    }
    let pos = free_actor_pos(map, record)?;
    let player = Entity {
        name: record.name.clone(),
        level: stats.level,
        experience: stats.experience,
        gold: stats.gold,
        max_life: stats.max_life,
        attack: stats.attack,
        armor_class: stats.armor_class,
        life: record.value_i32().clamp(1, stats.max_life),
        ..Entity::player(pos)
    };
    let id = map.spawn_player(player);
    map.entities[id].pos = pos;
    Ok(id)
}

fn required_pos(record: &Record) -> Result<Pos, CoreError> {
    record.pos.ok_or_else(|| record.unknown())
}

fn walkable_pos(map: &GameMap, record: &Record) -> Result<Pos, CoreError> {
    let pos = required_pos(record)?;
    if !map.is_walkable(pos) {
        return Err(record.invalid("position is not walkable"));
    }
    Ok(pos)
}

/// Actors need a walkable tile that no living entity holds yet.
fn free_actor_pos(map: &GameMap, record: &Record) -> Result<Pos, CoreError> {
    let pos = walkable_pos(map, record)?;
    if map.living_entity_at(pos).is_some() {
        return Err(record.invalid("position is already occupied"));
    }
    Ok(pos)
}

fn enemy_at(map: &GameMap, pos: Pos, record: &Record) -> Result<EntityId, CoreError> {
    map.living_entity_at(pos)
        .filter(|&id| !map.entities[id].is_player())
        .ok_or_else(|| record.unknown())
}

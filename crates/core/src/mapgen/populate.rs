//! Depth-scaled placement of loot, traps and enemies into generated rooms.
//! The first room is the spawn room and never receives anything.

use crate::config::SpawnConfig;
use crate::content::{Item, Trap, pick_enemy_kind, pick_item, pick_trap_kind, roll_enemy_loot};
use crate::entity::Entity;
use crate::rng::RandomSource;
use crate::state::GameMap;
use crate::types::{Pos, TileKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulationSummary {
    pub items: usize,
    pub traps: usize,
    pub enemies: usize,
    pub win_item_placed: bool,
}

/// Mutates `map` in place. Every roll draws from `rng`, so the same stream
/// position always yields the same population.
pub fn populate(
    map: &mut GameMap,
    level_number: u32,
    spawn: &SpawnConfig,
    rng: &mut RandomSource,
) -> PopulationSummary {
    let mut summary = PopulationSummary::default();
    let room_count = map.rooms.len();
    let terminal = spawn.is_terminal(level_number);
    if room_count <= 1 {
        if terminal {
            log::warn!("level {level_number} has no room besides the spawn room for the win item");
        }
        return summary;
    }

    let win_room = terminal.then(|| rng.range_usize(1, room_count - 1));

    for room_index in 1..room_count {
        let mut candidates = free_floor_positions(map, room_index);

        if win_room == Some(room_index) {
            if let Some(pos) = rng.take(&mut candidates) {
                map.place_item(pos, Item::amulet());
                summary.win_item_placed = true;
                summary.items += 1;
            }
        } else if rng.chance(spawn.loot_rate) {
            let rolls = rng.range_usize(0, spawn.max_loot_per_room);
            for _ in 0..rolls {
                let Some(pos) = rng.take(&mut candidates) else { break };
                map.place_item(pos, pick_item(level_number, rng));
                summary.items += 1;
            }
        }

        if rng.chance(spawn.trap_rate)
            && let Some(pos) = rng.take(&mut candidates)
        {
            let kind = pick_trap_kind(level_number, spawn, rng);
            map.place_trap(pos, Trap { kind, revealed: false });
            summary.traps += 1;
        }

        let mut spawned = 0;
        while spawned < spawn.max_enemies_per_room && rng.chance(spawn.enemy_rate) {
            let Some(pos) = rng.take(&mut candidates) else { break };
            let Some(kind) = pick_enemy_kind(level_number, spawn, rng) else { break };
            let mut enemy = Entity::enemy(kind, level_number, pos);
            enemy.asleep = rng.chance(spawn.sleep_rate);
            enemy.drop = roll_enemy_loot(kind, level_number, rng);
            map.spawn(enemy);
            spawned += 1;
        }
        summary.enemies += spawned;
    }

    log::debug!(
        "populated level {level_number}: {} items, {} traps, {} enemies",
        summary.items,
        summary.traps,
        summary.enemies
    );
    summary
}

/// Interior floor tiles of a room that hold nothing yet, in reading order.
fn free_floor_positions(map: &GameMap, room_index: usize) -> Vec<Pos> {
    map.rooms[room_index]
        .interior()
        .filter(|&pos| {
            map.tile_at(pos) == TileKind::Floor
                && !map.items.contains_key(&pos)
                && map.living_entity_at(pos).is_none()
        })
        .collect()
}

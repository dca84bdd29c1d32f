//! Shared hand-built maps for the `game` submodule tests.

use super::*;
use crate::content::EnemyKind;
use crate::mapgen::{Difficulty, Room};

/// A one-tile-high corridor of floor at `y = 2`, `x = 1..=10`, walled around.
pub(super) fn corridor_map() -> GameMap {
    let mut map = GameMap::new(12, 5);
    for x in 1..=10 {
        map.set_tile_at(Pos { y: 2, x }, TileKind::Floor);
    }
    map.rooms.push(Room::new(Pos { y: 1, x: 0 }, 12, 3));
    map.start = Pos { y: 2, x: 2 };
    map
}

/// An 8x8 floor area inside a 10x10 map with the start at (2, 2).
pub(super) fn open_room_map() -> GameMap {
    let mut map = GameMap::new(10, 10);
    for y in 1..=8 {
        for x in 1..=8 {
            map.set_tile_at(Pos { y, x }, TileKind::Floor);
        }
    }
    map.rooms.push(Room::new(Pos { y: 0, x: 0 }, 10, 10));
    map.start = Pos { y: 2, x: 2 };
    map
}

/// Wraps a hand-built map (which gets a fresh player on its start) in a game.
pub(super) fn game_on(mut map: GameMap) -> Game {
    if map.player.is_none() {
        map.spawn_player(Entity::player(map.start));
    }
    let level = Level { map, level_number: STARTING_LEVEL, difficulty: Difficulty::Shallow };
    Game::from_level(GenerationConfig::default(), SpawnConfig::default(), level, 0)
        .expect("fixture map has a player")
}

pub(super) fn add_enemy(game: &mut Game, kind: EnemyKind, pos: Pos) -> EntityId {
    game.map_mut().spawn(Entity::enemy(kind, STARTING_LEVEL, pos))
}

pub(super) fn player_id(game: &Game) -> EntityId {
    game.map().player_id().expect("fixture has a player")
}

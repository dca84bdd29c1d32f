use std::collections::{BTreeSet, VecDeque};

use delve_core::config::{GenerationConfig, MAX_LEVEL, SpawnConfig};
use delve_core::mapgen::{Level, LevelGenerator, generate};
use delve_core::state::GameMap;
use delve_core::types::{Pos, TileKind};
use proptest::prelude::*;

fn reachable_from(map: &GameMap, start: Pos) -> BTreeSet<Pos> {
    let mut open = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(pos) = open.pop_front() {
        for next in [
            Pos { y: pos.y - 1, x: pos.x },
            Pos { y: pos.y + 1, x: pos.x },
            Pos { y: pos.y, x: pos.x - 1 },
            Pos { y: pos.y, x: pos.x + 1 },
        ] {
            if map.is_walkable(next) && seen.insert(next) {
                open.push_back(next);
            }
        }
    }
    seen
}

fn populated(seed: u64, level: u32) -> Level {
    LevelGenerator::new(GenerationConfig::default().with_seed(seed), SpawnConfig::default())
        .generate(level)
        .expect("default config always yields rooms")
}

#[test]
fn example_scenario_has_rooms_and_a_floor_start() {
    let config = GenerationConfig {
        map_width: 80,
        map_height: 45,
        min_room_size: 5,
        max_room_size: 15,
        min_partition_size: 10,
        max_depth: 5,
        seed: 1234,
        level_number: 1,
    };
    let first = generate(&config).expect("example scenario generates");
    assert!(!first.map.rooms.is_empty());
    assert_eq!(first.map.tile_at(first.map.start), TileKind::Floor);

    let second = generate(&config).expect("example scenario generates");
    assert_eq!(second.map.rooms.len(), first.map.rooms.len());
    assert_eq!(second.map.start, first.map.start);
}

#[test]
fn terminal_level_holds_exactly_one_amulet_outside_the_spawn_room() {
    let level = populated(31337, MAX_LEVEL);
    let amulets: Vec<Pos> = level
        .map
        .items
        .iter()
        .filter(|(_, item)| item.is_win_item())
        .map(|(&pos, _)| pos)
        .collect();
    assert_eq!(amulets.len(), 1);
    assert!(!level.map.rooms[0].contains(amulets[0]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]
    #[test]
    fn every_room_is_reachable_from_the_start(seed in any::<u64>(), level in 1_u32..=MAX_LEVEL) {
        let level = populated(seed, level);
        let reachable = reachable_from(&level.map, level.map.start);
        for (index, room) in level.map.rooms.iter().enumerate() {
            prop_assert!(
                reachable.contains(&room.center()),
                "seed={seed}: room {index} at {:?} is cut off", room.origin
            );
        }
    }

    #[test]
    fn start_and_stairs_are_walkable(seed in any::<u64>(), level in 1_u32..=MAX_LEVEL) {
        let level = populated(seed, level);
        prop_assert!(level.map.is_walkable(level.map.start));
        if let Some(stairs) = level.map.stairs {
            prop_assert_eq!(level.map.tile_at(stairs), TileKind::StairsUp);
            prop_assert!(level.map.rooms.len() > 1);
        }
    }

    #[test]
    fn rooms_never_overlap(seed in any::<u64>()) {
        let level = populated(seed, 1);
        let rooms = &level.map.rooms;
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                prop_assert!(!a.intersects(b), "seed={seed}: {a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn corridors_never_replace_room_floor(seed in any::<u64>()) {
        let level = generate(&GenerationConfig::default().with_seed(seed))
            .expect("default config always yields rooms");
        for room in &level.map.rooms {
            for y in room.origin.y..=room.bottom() {
                for x in room.origin.x..=room.right() {
                    prop_assert_ne!(level.map.tile_at(Pos { y, x }), TileKind::Corridor);
                }
            }
        }
        for hallway in &level.map.hallways {
            let (from, to) = hallway.rooms;
            for pos in &hallway.path {
                prop_assert!(!level.map.rooms[from].contains(*pos));
                prop_assert!(!level.map.rooms[to].contains(*pos));
            }
        }
    }

    #[test]
    fn spawn_room_is_never_populated(seed in any::<u64>(), level in 1_u32..=MAX_LEVEL) {
        let level = populated(seed, level);
        let spawn_room = &level.map.rooms[0];
        prop_assert!(level.map.items.keys().all(|&pos| !spawn_room.contains(pos)));
        prop_assert!(level.map.traps.keys().all(|&pos| !spawn_room.contains(pos)));
        prop_assert!(level.map.entities.values().all(|entity| !spawn_room.contains(entity.pos)));
    }
}

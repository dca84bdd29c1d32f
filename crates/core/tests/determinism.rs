use delve_core::config::{GenerationConfig, MAX_LEVEL, SpawnConfig};
use delve_core::mapgen::{Level, LevelGenerator};
use delve_core::types::Pos;
use xxhash_rust::xxh3::xxh3_64;

fn build(seed: u64, level: u32) -> Level {
    LevelGenerator::new(GenerationConfig::default().with_seed(seed), SpawnConfig::default())
        .generate(level)
        .expect("default config always yields rooms")
}

fn enemy_layout(level: &Level) -> Vec<(Pos, &'static str)> {
    let mut enemies: Vec<(Pos, &'static str)> =
        level.map.entities.values().map(|entity| (entity.pos, entity.tag())).collect();
    enemies.sort();
    enemies
}

#[test]
fn same_seed_and_level_yield_identical_population() {
    for level_number in 1..=MAX_LEVEL {
        let first = build(12345, level_number);
        let second = build(12345, level_number);

        assert_eq!(first.map.rooms.len(), second.map.rooms.len());
        assert_eq!(first.map.start, second.map.start);
        assert_eq!(enemy_layout(&first), enemy_layout(&second));
        assert_eq!(first.map.items, second.map.items);
        assert_eq!(first.map.traps, second.map.traps);
        assert_eq!(
            xxh3_64(&first.map.canonical_bytes()),
            xxh3_64(&second.map.canonical_bytes()),
            "level {level_number} fingerprint drifted"
        );
    }
}

#[test]
fn levels_of_one_seed_differ_from_each_other() {
    let fingerprints: Vec<u64> =
        (1..=MAX_LEVEL).map(|level| xxh3_64(&build(777, level).map.canonical_bytes())).collect();
    for (i, a) in fingerprints.iter().enumerate() {
        for b in &fingerprints[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn different_seeds_produce_different_layouts() {
    let a = build(1, 1);
    let b = build(2, 1);
    assert_ne!(xxh3_64(&a.map.canonical_bytes()), xxh3_64(&b.map.canonical_bytes()));
}

#[test]
fn deeper_levels_are_more_dangerous_on_average() {
    let enemies_at = |level: u32| -> usize {
        (0..40_u64).map(|seed| build(seed, level).map.entities.len()).sum()
    };
    assert!(enemies_at(MAX_LEVEL) > enemies_at(1));
}

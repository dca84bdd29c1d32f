//! Static content tables: enemy kinds, loot and traps, and the depth-weighted
//! factories population draws from.

use serde::{Deserialize, Serialize};

use crate::config::SpawnConfig;
use crate::rng::RandomSource;

pub const AMULET_NAME: &str = "Amulet of Yendor";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Rat,
    Kobold,
    Goblin,
    Skeleton,
    Orc,
    Wraith,
    Troll,
    Dragon,
}

/// How an enemy picks its next step each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStrategy {
    Pursue,
    Wander,
    /// Pursues with the given percent chance, otherwise wanders.
    Mixed { pursue_percent: u8 },
}

/// What an enemy carries and drops on death, rolled at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LootStrategy {
    Nothing,
    Gold { min: i32, max: i32 },
    Item,
}

pub struct EnemyStats {
    pub name: &'static str,
    pub min_level: u32,
    pub spawn_weight: u32,
    pub life: i32,
    pub life_per_level: i32,
    pub attack: i32,
    pub armor_class: i32,
    pub experience: u32,
    pub movement: MovementStrategy,
    pub loot: LootStrategy,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 8] = [
        EnemyKind::Rat,
        EnemyKind::Kobold,
        EnemyKind::Goblin,
        EnemyKind::Skeleton,
        EnemyKind::Orc,
        EnemyKind::Wraith,
        EnemyKind::Troll,
        EnemyKind::Dragon,
    ];

    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Rat => EnemyStats {
                name: "rat",
                min_level: 1,
                spawn_weight: 10,
                life: 4,
                life_per_level: 1,
                attack: 3,
                armor_class: 0,
                experience: 5,
                movement: MovementStrategy::Wander,
                loot: LootStrategy::Nothing,
            },
            EnemyKind::Kobold => EnemyStats {
                name: "kobold",
                min_level: 1,
                spawn_weight: 8,
                life: 6,
                life_per_level: 2,
                attack: 5,
                armor_class: 1,
                experience: 10,
                movement: MovementStrategy::Mixed { pursue_percent: 60 },
                loot: LootStrategy::Gold { min: 2, max: 10 },
            },
            EnemyKind::Goblin => EnemyStats {
                name: "goblin",
                min_level: 2,
                spawn_weight: 8,
                life: 9,
                life_per_level: 2,
                attack: 6,
                armor_class: 2,
                experience: 15,
                movement: MovementStrategy::Pursue,
                loot: LootStrategy::Gold { min: 5, max: 15 },
            },
            EnemyKind::Skeleton => EnemyStats {
                name: "skeleton",
                min_level: 3,
                spawn_weight: 6,
                life: 12,
                life_per_level: 3,
                attack: 7,
                armor_class: 4,
                experience: 25,
                movement: MovementStrategy::Pursue,
                loot: LootStrategy::Item,
            },
            EnemyKind::Orc => EnemyStats {
                name: "orc",
                min_level: 4,
                spawn_weight: 6,
                life: 16,
                life_per_level: 3,
                attack: 9,
                armor_class: 4,
                experience: 35,
                movement: MovementStrategy::Mixed { pursue_percent: 75 },
                loot: LootStrategy::Gold { min: 10, max: 30 },
            },
            EnemyKind::Wraith => EnemyStats {
                name: "wraith",
                min_level: 6,
                spawn_weight: 4,
                life: 18,
                life_per_level: 3,
                attack: 11,
                armor_class: 5,
                experience: 50,
                movement: MovementStrategy::Mixed { pursue_percent: 50 },
                loot: LootStrategy::Item,
            },
            EnemyKind::Troll => EnemyStats {
                name: "troll",
                min_level: 7,
                spawn_weight: 3,
                life: 28,
                life_per_level: 4,
                attack: 13,
                armor_class: 6,
                experience: 80,
                movement: MovementStrategy::Pursue,
                loot: LootStrategy::Gold { min: 20, max: 60 },
            },
            EnemyKind::Dragon => EnemyStats {
                name: "dragon",
                min_level: 9,
                spawn_weight: 1,
                life: 45,
                life_per_level: 5,
                attack: 16,
                armor_class: 8,
                experience: 150,
                movement: MovementStrategy::Pursue,
                loot: LootStrategy::Item,
            },
        }
    }

    pub fn tag(self) -> &'static str {
        self.stats().name
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Gold,
    Potion,
    Weapon,
    Armor,
    Amulet,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] =
        [ItemKind::Gold, ItemKind::Potion, ItemKind::Weapon, ItemKind::Armor, ItemKind::Amulet];

    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::Gold => "gold",
            ItemKind::Potion => "potion",
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Amulet => "amulet",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn glyph(self) -> char {
        match self {
            ItemKind::Gold => '$',
            ItemKind::Potion => '!',
            ItemKind::Weapon => ')',
            ItemKind::Armor => '[',
            ItemKind::Amulet => '"',
        }
    }
}

/// A concrete item; `value` is the gold amount, heal amount or bonus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub name: String,
    pub value: i32,
}

impl Item {
    pub fn gold(amount: i32) -> Self {
        Self { kind: ItemKind::Gold, name: format!("{amount} gold"), value: amount }
    }

    pub fn amulet() -> Self {
        Self { kind: ItemKind::Amulet, name: AMULET_NAME.to_string(), value: 0 }
    }

    pub fn is_win_item(&self) -> bool {
        self.kind == ItemKind::Amulet
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    Spike,
    PoisonDart,
    Teleport,
}

impl TrapKind {
    pub const ALL: [TrapKind; 3] = [TrapKind::Spike, TrapKind::PoisonDart, TrapKind::Teleport];

    pub fn tag(self) -> &'static str {
        match self {
            TrapKind::Spike => "spike",
            TrapKind::PoisonDart => "poison_dart",
            TrapKind::Teleport => "teleport",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            TrapKind::Spike => "spike trap",
            TrapKind::PoisonDart => "poison dart trap",
            TrapKind::Teleport => "teleport trap",
        }
    }

    fn min_level(self, spawn: &SpawnConfig) -> u32 {
        match self {
            TrapKind::Spike => 1,
            TrapKind::PoisonDart => spawn.poison_trap_min_level,
            TrapKind::Teleport => spawn.teleport_trap_min_level,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub kind: TrapKind,
    pub revealed: bool,
}

const BASE_TRAP_WEIGHT: u32 = 10;

/// Kinds unlocked at `level_number` gain extra weight the deeper they appear,
/// so early kinds thin out as the dungeon gets harder.
pub fn pick_enemy_kind(
    level_number: u32,
    spawn: &SpawnConfig,
    rng: &mut RandomSource,
) -> Option<EnemyKind> {
    let weights: Vec<u32> = EnemyKind::ALL
        .iter()
        .map(|kind| {
            let stats = kind.stats();
            if stats.min_level > level_number {
                return 0;
            }
            let depth = level_number - stats.min_level;
            stats.spawn_weight + spawn.depth_weight_per_level * depth.min(3)
        })
        .collect();
    rng.weighted_index(&weights).map(|index| EnemyKind::ALL[index])
}

pub fn pick_trap_kind(level_number: u32, spawn: &SpawnConfig, rng: &mut RandomSource) -> TrapKind {
    let weights: Vec<u32> = TrapKind::ALL
        .iter()
        .map(|kind| {
            let min_level = kind.min_level(spawn);
            if min_level > level_number {
                0
            } else {
                BASE_TRAP_WEIGHT + spawn.depth_weight_per_level * (level_number - min_level)
            }
        })
        .collect();
    rng.weighted_index(&weights).map_or(TrapKind::Spike, |index| TrapKind::ALL[index])
}

/// Ordinary loot roll: gold, potions, and gear whose bonus grows with depth.
pub fn pick_item(level_number: u32, rng: &mut RandomSource) -> Item {
    let depth = level_number.max(1) as i32;
    let gear_weight = 10 + level_number;
    match rng.weighted_index(&[40, 25, gear_weight, gear_weight]) {
        Some(1) => Item { kind: ItemKind::Potion, name: "healing potion".into(), value: 10 + 2 * depth },
        Some(2) => {
            let bonus = 1 + depth / 3 + rng.range_i32(0, 1);
            let name = match bonus {
                ..=1 => "dagger",
                2 => "short sword",
                3 => "long sword",
                _ => "war axe",
            };
            Item { kind: ItemKind::Weapon, name: name.into(), value: bonus }
        }
        Some(3) => {
            let bonus = 1 + depth / 4;
            let name = match bonus {
                ..=1 => "leather armor",
                2 => "chain mail",
                _ => "plate mail",
            };
            Item { kind: ItemKind::Armor, name: name.into(), value: bonus }
        }
        _ => Item::gold(rng.range_i32(5, 10 + 5 * depth)),
    }
}

pub fn roll_enemy_loot(kind: EnemyKind, level_number: u32, rng: &mut RandomSource) -> Option<Item> {
    match kind.stats().loot {
        LootStrategy::Nothing => None,
        LootStrategy::Gold { min, max } => Some(Item::gold(rng.range_i32(min, max))),
        LootStrategy::Item => Some(pick_item(level_number, rng)),
    }
}

//! The single actor record shared by the player and every enemy kind.
//! Per-kind differences live in data (stats, movement, loot), not in types.

use crate::content::{EnemyKind, Item, ItemKind, MovementStrategy};
use crate::error::CoreError;
use crate::types::{EntityId, Pos};

pub const EXPERIENCE_PER_LEVEL: u32 = 50;
pub const LIFE_PER_PLAYER_LEVEL: i32 = 5;
pub const ATTACK_PER_PLAYER_LEVEL: i32 = 1;

const PLAYER_LIFE: i32 = 30;
const PLAYER_ATTACK: i32 = 10;
const PLAYER_ARMOR_CLASS: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Player,
    Enemy(EnemyKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub pos: Pos,
    pub level: u32,
    pub armor_class: i32,
    pub attack: i32,
    pub life: i32,
    pub max_life: i32,
    pub alive: bool,
    pub asleep: bool,
    pub experience: u32,
    /// Experience awarded to whoever kills this entity.
    pub experience_value: u32,
    pub gold: i32,
    pub inventory: Vec<Item>,
    pub drop: Option<Item>,
    pub movement: MovementStrategy,
}

impl Entity {
    pub fn player(pos: Pos) -> Self {
        Self {
            id: EntityId::default(),
            kind: EntityKind::Player,
            name: "you".to_string(),
            pos,
            level: 1,
            armor_class: PLAYER_ARMOR_CLASS,
            attack: PLAYER_ATTACK,
            life: PLAYER_LIFE,
            max_life: PLAYER_LIFE,
            alive: true,
            asleep: false,
            experience: 0,
            experience_value: 0,
            gold: 0,
            inventory: Vec::new(),
            drop: None,
            movement: MovementStrategy::Pursue,
        }
    }

    /// An enemy scaled to the dungeon level it spawns on.
    pub fn enemy(kind: EnemyKind, level_number: u32, pos: Pos) -> Self {
        let stats = kind.stats();
        let extra_levels = level_number.saturating_sub(stats.min_level) as i32;
        let life = stats.life + stats.life_per_level * extra_levels;
        Self {
            id: EntityId::default(),
            kind: EntityKind::Enemy(kind),
            name: stats.name.to_string(),
            pos,
            level: level_number.max(stats.min_level),
            armor_class: stats.armor_class + extra_levels / 3,
            attack: stats.attack + extra_levels / 2,
            life,
            max_life: life,
            alive: true,
            asleep: false,
            experience: 0,
            experience_value: stats.experience + 2 * extra_levels as u32,
            gold: 0,
            inventory: Vec::new(),
            drop: None,
            movement: stats.movement,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        match self.kind {
            EntityKind::Enemy(kind) => Some(kind),
            EntityKind::Player => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self.kind {
            EntityKind::Player => "player",
            EntityKind::Enemy(kind) => kind.tag(),
        }
    }

    /// Base attack plus the best carried weapon.
    pub fn attack_value(&self) -> i32 {
        self.attack + self.best_bonus(ItemKind::Weapon)
    }

    /// Base armor class plus the best carried armor.
    pub fn armor_value(&self) -> i32 {
        self.armor_class + self.best_bonus(ItemKind::Armor)
    }

    fn best_bonus(&self, kind: ItemKind) -> i32 {
        self.inventory
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.value)
            .max()
            .unwrap_or(0)
    }

    /// Applies damage, clamping life at zero. Returns the damage dealt.
    pub fn take_damage(&mut self, amount: i32) -> Result<i32, CoreError> {
        if !self.alive {
            return Err(CoreError::DeadEntity(self.id));
        }
        let dealt = amount.max(0).min(self.life);
        self.life -= dealt;
        if self.life <= 0 {
            self.life = 0;
            self.alive = false;
        }
        Ok(dealt)
    }

    /// Restores life up to the maximum. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> Result<i32, CoreError> {
        if !self.alive {
            return Err(CoreError::DeadEntity(self.id));
        }
        let healed = amount.max(0).min(self.max_life - self.life);
        self.life += healed;
        Ok(healed)
    }

    /// Adds experience and levels up as many times as the total allows,
    /// carrying the remainder. Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= EXPERIENCE_PER_LEVEL {
            self.experience -= EXPERIENCE_PER_LEVEL;
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.max_life += LIFE_PER_PLAYER_LEVEL;
        self.attack += ATTACK_PER_PLAYER_LEVEL;
        self.life = self.max_life;
    }

    /// Moves the drop (gold or item) onto `receiver`. Returns what moved.
    pub fn transfer_drop_to(&mut self, receiver: &mut Entity) -> Option<Item> {
        let item = self.drop.take()?;
        if item.kind == ItemKind::Gold {
            receiver.gold += item.value;
        } else {
            receiver.inventory.push(item.clone());
        }
        Some(item)
    }
}

//! Public geometry produced by generation: rooms, hallways and finished levels.

use serde::{Deserialize, Serialize};

use crate::config::MAX_LEVEL;
use crate::state::GameMap;
use crate::types::{Pos, manhattan};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub origin: Pos,
    pub width: usize,
    pub height: usize,
    /// Positions of loot placed in this room that is still on the floor.
    pub items: Vec<Pos>,
    pub traps: Vec<Pos>,
}

impl Room {
    pub fn new(origin: Pos, width: usize, height: usize) -> Self {
        Self { origin, width, height, items: Vec::new(), traps: Vec::new() }
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.width as i32 - 1
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.height as i32 - 1
    }

    pub fn center(&self) -> Pos {
        Pos {
            y: self.origin.y + (self.height / 2) as i32,
            x: self.origin.x + (self.width / 2) as i32,
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.origin.x
            && pos.x <= self.right()
            && pos.y >= self.origin.y
            && pos.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.origin.x <= other.right()
            && self.right() >= other.origin.x
            && self.origin.y <= other.bottom()
            && self.bottom() >= other.origin.y
    }

    /// Positions inside the room minus its outermost ring.
    pub fn interior(&self) -> impl Iterator<Item = Pos> + '_ {
        let (left, right) = (self.origin.x + 1, self.right() - 1);
        let (top, bottom) = (self.origin.y + 1, self.bottom() - 1);
        (top..=bottom).flat_map(move |y| (left..=right).map(move |x| Pos { y, x }))
    }

    pub fn center_distance(&self, other: &Room) -> u32 {
        manhattan(self.center(), other.center())
    }
}

/// An L-shaped connector. `rooms` indexes into the owning map's room list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hallway {
    pub path: Vec<Pos>,
    pub rooms: (usize, usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Shallow,
    Middle,
    Deep,
    Abyss,
}

impl Difficulty {
    pub fn for_level(level_number: u32) -> Self {
        match level_number * 4 / (MAX_LEVEL + 1) {
            0 => Difficulty::Shallow,
            1 => Difficulty::Middle,
            2 => Difficulty::Deep,
            _ => Difficulty::Abyss,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Level {
    pub map: GameMap,
    pub level_number: u32,
    pub difficulty: Difficulty,
}

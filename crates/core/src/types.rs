use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn from_xy(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub fn chebyshev(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Corridor,
    Door,
    StairsUp,
    Trap,
    Void,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::Void)
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Corridor => ',',
            TileKind::Door => '+',
            TileKind::StairsUp => '<',
            TileKind::Trap => '^',
            TileKind::Void => ' ',
        }
    }
}

/// One of the eight compass steps, or standing still.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Idle,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
        Direction::Idle,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
            Direction::DownLeft => (-1, 1),
            Direction::DownRight => (1, 1),
            Direction::Idle => (0, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Direction::Up,
            (0, 1) => Direction::Down,
            (-1, 0) => Direction::Left,
            (1, 0) => Direction::Right,
            (-1, -1) => Direction::UpLeft,
            (1, -1) => Direction::UpRight,
            (-1, 1) => Direction::DownLeft,
            (1, 1) => Direction::DownRight,
            _ => Direction::Idle,
        }
    }

    /// Maps roguelike keys (`hjklyubn`, `.`) to directions.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'k' => Some(Direction::Up),
            'j' => Some(Direction::Down),
            'h' => Some(Direction::Left),
            'l' => Some(Direction::Right),
            'y' => Some(Direction::UpLeft),
            'u' => Some(Direction::UpRight),
            'b' => Some(Direction::DownLeft),
            'n' => Some(Direction::DownRight),
            '.' => Some(Direction::Idle),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    PlayerMoved { to: Pos },
    Attacked { attacker: EntityId, target: EntityId, damage: i32 },
    EntityDied { entity: EntityId },
    ItemPickedUp { name: String },
    GoldCollected { amount: i32 },
    TrapTriggered { pos: Pos },
    LevelUp { entity: EntityId, level: u32 },
    EnemyWoke { enemy: EntityId },
    StairsReached { pos: Pos },
    LevelChanged { level_number: u32 },
    Finished(RunOutcome),
}

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::content::{Item, Trap};
use crate::entity::Entity;
use crate::error::CoreError;
use crate::mapgen::model::{Hallway, Room};
use crate::types::*;

/// One level's full mutable state. Tile dimensions are fixed at construction.
#[derive(Clone, Debug)]
pub struct GameMap {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
    pub rooms: Vec<Room>,
    pub hallways: Vec<Hallway>,
    pub entities: SlotMap<EntityId, Entity>,
    pub items: BTreeMap<Pos, Item>,
    pub traps: BTreeMap<Pos, Trap>,
    pub start: Pos,
    pub stairs: Option<Pos>,
    pub player: Option<EntityId>,
}

impl GameMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileKind::Wall; width * height],
            rooms: Vec::new(),
            hallways: Vec::new(),
            entities: SlotMap::with_key(),
            items: BTreeMap::new(),
            traps: BTreeMap::new(),
            start: Pos::default(),
            stairs: None,
            player: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-bounds positions read as `Void`.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Void;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile_at(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn living_entity_at(&self, pos: Pos) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, entity)| entity.alive && entity.pos == pos)
            .map(|(id, _)| id)
    }

    /// Inserts an entity and stamps its id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        self.entities[id].id = id;
        id
    }

    pub fn spawn_player(&mut self, mut player: Entity) -> EntityId {
        player.pos = self.start;
        let id = self.spawn(player);
        self.player = Some(id);
        id
    }

    pub fn player_id(&self) -> Result<EntityId, CoreError> {
        let id = self.player.ok_or(CoreError::MissingPlayer)?;
        if !self.entities.contains_key(id) {
            return Err(CoreError::MissingPlayer);
        }
        Ok(id)
    }

    pub fn player(&self) -> Result<&Entity, CoreError> {
        let id = self.player_id()?;
        Ok(&self.entities[id])
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, CoreError> {
        self.entities.get(id).ok_or(CoreError::UnknownEntity(id))
    }

    /// Living enemies in a stable order (reading order, then kind).
    pub fn living_enemy_ids(&self) -> Vec<EntityId> {
        let mut enemies: Vec<(Pos, EntityId)> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.alive && !entity.is_player())
            .map(|(id, entity)| (entity.pos, id))
            .collect();
        enemies.sort_by_key(|&(pos, id)| (pos, self.entities[id].kind));
        enemies.into_iter().map(|(_, id)| id).collect()
    }

    /// Removes dead entities. The player is kept even when dead.
    pub fn reap_dead(&mut self) -> usize {
        let before = self.entities.len();
        let player = self.player;
        self.entities.retain(|id, entity| entity.alive || Some(id) == player);
        before - self.entities.len()
    }

    pub fn room_containing(&self, pos: Pos) -> Option<usize> {
        self.rooms.iter().position(|room| room.contains(pos))
    }

    /// Places an item on an empty spot. Returns `false` if one is already there.
    pub fn place_item(&mut self, pos: Pos, item: Item) -> bool {
        if self.items.contains_key(&pos) {
            return false;
        }
        self.items.insert(pos, item);
        if let Some(room) = self.room_containing(pos) {
            self.rooms[room].items.push(pos);
        }
        true
    }

    pub fn take_item(&mut self, pos: Pos) -> Option<Item> {
        let item = self.items.remove(&pos)?;
        if let Some(room) = self.room_containing(pos) {
            self.rooms[room].items.retain(|&item_pos| item_pos != pos);
        }
        Some(item)
    }

    /// Places a trap and retags its tile.
    pub fn place_trap(&mut self, pos: Pos, trap: Trap) {
        self.traps.insert(pos, trap);
        self.set_tile_at(pos, TileKind::Trap);
        if let Some(room) = self.room_containing(pos) {
            self.rooms[room].traps.push(pos);
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(*tile as u8);
        }
        bytes.extend(self.start.y.to_le_bytes());
        bytes.extend(self.start.x.to_le_bytes());
        if let Some(stairs) = self.stairs {
            bytes.extend(stairs.y.to_le_bytes());
            bytes.extend(stairs.x.to_le_bytes());
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.origin.y.to_le_bytes());
            bytes.extend(room.origin.x.to_le_bytes());
            bytes.extend((room.width as u32).to_le_bytes());
            bytes.extend((room.height as u32).to_le_bytes());
        }

        // Dead enemies are inert until reaped, so they do not count.
        let mut entities: Vec<&Entity> =
            self.entities.values().filter(|entity| entity.alive || entity.is_player()).collect();
        entities.sort_by_key(|entity| (entity.pos, entity.kind));
        bytes.extend((entities.len() as u32).to_le_bytes());
        for entity in entities {
            bytes.extend(entity.tag().as_bytes());
            bytes.extend(entity.pos.y.to_le_bytes());
            bytes.extend(entity.pos.x.to_le_bytes());
            bytes.extend(entity.life.to_le_bytes());
            bytes.push(u8::from(entity.asleep));
        }

        bytes.extend((self.items.len() as u32).to_le_bytes());
        for (pos, item) in &self.items {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(item.name.as_bytes());
            bytes.extend(item.value.to_le_bytes());
        }

        bytes.extend((self.traps.len() as u32).to_le_bytes());
        for (pos, trap) in &self.traps {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(trap.kind.tag().as_bytes());
        }
        bytes
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{EnemyKind, TrapKind};

    fn open_map() -> GameMap {
        let mut map = GameMap::new(8, 6);
        for y in 1..5 {
            for x in 1..7 {
                map.set_tile_at(Pos { y, x }, TileKind::Floor);
            }
        }
        map.rooms.push(Room::new(Pos::from_xy(1, 1), 6, 4));
        map.start = Pos::from_xy(2, 2);
        map
    }

    #[test]
    fn out_of_bounds_reads_as_void_and_writes_are_ignored() {
        let mut map = open_map();
        assert_eq!(map.tile_at(Pos::from_xy(-1, 0)), TileKind::Void);
        assert_eq!(map.tile_at(Pos::from_xy(8, 0)), TileKind::Void);
        map.set_tile_at(Pos::from_xy(99, 99), TileKind::Floor);
        assert!(!map.is_walkable(Pos::from_xy(99, 99)));
    }

    #[test]
    fn dead_entities_do_not_occupy_tiles() {
        let mut map = open_map();
        let rat = map.spawn(Entity::enemy(EnemyKind::Rat, 1, Pos::from_xy(3, 3)));
        assert_eq!(map.living_entity_at(Pos::from_xy(3, 3)), Some(rat));
        map.entities[rat].alive = false;
        assert_eq!(map.living_entity_at(Pos::from_xy(3, 3)), None);
        assert_eq!(map.reap_dead(), 1);
        assert!(map.entities.is_empty());
    }

    #[test]
    fn reaping_keeps_a_dead_player() {
        let mut map = open_map();
        let player = map.spawn_player(Entity::player(Pos::default()));
        map.entities[player].alive = false;
        assert_eq!(map.reap_dead(), 0);
        assert_eq!(map.player_id(), Ok(player));
    }

    #[test]
    fn missing_player_is_reported() {
        let map = open_map();
        assert_eq!(map.player_id(), Err(CoreError::MissingPlayer));
    }

    #[test]
    fn items_are_tracked_by_position_and_room() {
        let mut map = open_map();
        let pos = Pos::from_xy(4, 2);
        assert!(map.place_item(pos, Item::gold(3)));
        assert!(!map.place_item(pos, Item::gold(4)));
        assert_eq!(map.rooms[0].items, vec![pos]);
        assert_eq!(map.take_item(pos), Some(Item::gold(3)));
        assert!(map.rooms[0].items.is_empty());
        assert_eq!(map.take_item(pos), None);
    }

    #[test]
    fn placing_a_trap_retags_the_tile() {
        let mut map = open_map();
        let pos = Pos::from_xy(5, 3);
        map.place_trap(pos, Trap { kind: TrapKind::Spike, revealed: false });
        assert_eq!(map.tile_at(pos), TileKind::Trap);
        assert!(map.is_walkable(pos));
        assert_eq!(map.rooms[0].traps, vec![pos]);
    }
}

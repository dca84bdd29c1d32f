//! Stamps room and hallway geometry onto the tile grid.

use crate::state::GameMap;
use crate::types::{Pos, TileKind};

/// Expects a wall-filled map whose rooms and hallways are already set.
/// Rooms win over hallways: corridor tiles are only carved through wall.
pub fn rasterize(map: &mut GameMap) {
    let rooms = map.rooms.clone();
    for room in &rooms {
        for y in room.origin.y..=room.bottom() {
            for x in room.origin.x..=room.right() {
                map.set_tile_at(Pos { y, x }, TileKind::Floor);
            }
        }
    }

    let paths: Vec<_> = map.hallways.iter().flat_map(|hallway| hallway.path.clone()).collect();
    for pos in paths {
        if map.tile_at(pos) == TileKind::Wall {
            map.set_tile_at(pos, TileKind::Corridor);
        }
    }

    if let Some(first) = rooms.first() {
        map.start = first.center();
    }
    if rooms.len() > 1
        && let Some(last) = rooms.last()
    {
        let stairs = last.center();
        map.set_tile_at(stairs, TileKind::StairsUp);
        map.stairs = Some(stairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::corridors::build_hallway;
    use crate::mapgen::model::Room;

    fn two_room_map() -> GameMap {
        let mut map = GameMap::new(30, 20);
        map.rooms = vec![Room::new(Pos::from_xy(1, 1), 6, 5), Room::new(Pos::from_xy(15, 10), 7, 6)];
        map.hallways = vec![build_hallway(&map.rooms, 0, 1, false)];
        map
    }

    #[test]
    fn rooms_become_floor_and_hallways_become_corridor() {
        let mut map = two_room_map();
        rasterize(&mut map);
        assert_eq!(map.tile_at(Pos::from_xy(1, 1)), TileKind::Floor);
        assert_eq!(map.tile_at(Pos::from_xy(0, 0)), TileKind::Wall);
        for &pos in &map.hallways[0].path {
            assert_eq!(map.tile_at(pos), TileKind::Corridor);
        }
    }

    #[test]
    fn start_is_first_room_center_and_stairs_last_room_center() {
        let mut map = two_room_map();
        rasterize(&mut map);
        assert_eq!(map.start, map.rooms[0].center());
        assert_eq!(map.tile_at(map.start), TileKind::Floor);
        let stairs = map.stairs.expect("two rooms place stairs");
        assert_eq!(stairs, map.rooms[1].center());
        assert_eq!(map.tile_at(stairs), TileKind::StairsUp);
    }

    #[test]
    fn single_room_has_no_stairs() {
        let mut map = GameMap::new(12, 12);
        map.rooms = vec![Room::new(Pos::from_xy(2, 2), 6, 6)];
        rasterize(&mut map);
        assert_eq!(map.stairs, None);
    }

    #[test]
    fn corridor_never_overwrites_room_floor() {
        let mut map = GameMap::new(40, 12);
        map.rooms = vec![
            Room::new(Pos::from_xy(1, 3), 5, 5),
            Room::new(Pos::from_xy(15, 3), 5, 5),
            Room::new(Pos::from_xy(30, 3), 5, 5),
        ];
        // The 0 -> 2 hallway runs straight through room 1.
        map.hallways = vec![build_hallway(&map.rooms, 0, 2, true)];
        rasterize(&mut map);
        let middle = map.rooms[1].clone();
        for pos in middle.interior() {
            assert_eq!(map.tile_at(pos), TileKind::Floor);
        }
    }
}

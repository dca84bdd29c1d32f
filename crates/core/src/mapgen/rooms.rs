//! Inscribes one randomly sized, randomly offset room inside each leaf.

use crate::rng::RandomSource;
use crate::types::Pos;

use super::model::Room;
use super::partition::PartitionNode;

/// Padding is this fraction of the smaller partition side, never below one.
const PADDING_DIVISOR: usize = 10;

#[derive(Clone, Copy, Debug)]
pub struct RoomBounds {
    pub min_size: usize,
    pub max_size: usize,
}

/// Returns `None` when the padded partition cannot hold a minimum room.
pub fn place_room(node: &PartitionNode, bounds: RoomBounds, rng: &mut RandomSource) -> Option<Room> {
    let padding = (node.width.min(node.height) / PADDING_DIVISOR).max(1);
    let available_width = node.width.checked_sub(padding * 2)?;
    let available_height = node.height.checked_sub(padding * 2)?;
    if available_width < bounds.min_size || available_height < bounds.min_size {
        return None;
    }

    let width = rng.range_usize(bounds.min_size, bounds.max_size.min(available_width));
    let height = rng.range_usize(bounds.min_size, bounds.max_size.min(available_height));
    let offset_x = rng.range_usize(0, available_width - width);
    let offset_y = rng.range_usize(0, available_height - height);

    let origin = Pos {
        y: node.origin.y + (padding + offset_y) as i32,
        x: node.origin.x + (padding + offset_x) as i32,
    };
    Some(Room::new(origin, width, height))
}

/// Places rooms in every leaf, left to right, recording each room's index on its leaf.
pub fn place_rooms(tree: &mut PartitionNode, bounds: RoomBounds, rng: &mut RandomSource) -> Vec<Room> {
    let mut rooms = Vec::new();
    for leaf in tree.leaves_mut() {
        if let Some(room) = place_room(leaf, bounds, rng) {
            leaf.room = Some(rooms.len());
            rooms.push(room);
        }
    }
    rooms
}

//! Single-step movement shared by the player and enemies.

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved(Pos),
    /// The destination holds another living entity; nothing moved.
    Occupied(EntityId),
    /// Out of bounds, wall or void; nothing moved.
    Blocked,
    Stayed,
}

/// Moves `id` one step if the destination is in bounds, walkable and free of
/// living entities. Moving a dead entity is a contract violation.
pub fn move_entity(
    map: &mut GameMap,
    id: EntityId,
    direction: Direction,
) -> Result<MoveResult, CoreError> {
    let entity = map.entity(id)?;
    if !entity.alive {
        return Err(CoreError::DeadEntity(id));
    }
    if direction == Direction::Idle {
        return Ok(MoveResult::Stayed);
    }

    let dest = entity.pos.step(direction);
    if !map.in_bounds(dest) || !map.is_walkable(dest) {
        return Ok(MoveResult::Blocked);
    }
    if let Some(occupant) = map.living_entity_at(dest) {
        return Ok(MoveResult::Occupied(occupant));
    }
    map.entities[id].pos = dest;
    Ok(MoveResult::Moved(dest))
}

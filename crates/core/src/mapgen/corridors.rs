//! Bottom-up hallway connection across the partition tree.

use crate::rng::RandomSource;
use crate::types::Pos;

use super::model::{Hallway, Room};
use super::partition::PartitionNode;

/// Connects every subtree pair that both hold rooms, producing a spanning set
/// of hallways over all placed rooms.
pub fn connect_rooms(tree: &PartitionNode, rooms: &[Room], rng: &mut RandomSource) -> Vec<Hallway> {
    let mut hallways = Vec::new();
    connect_subtree(tree, rooms, rng, &mut hallways);
    hallways
}

/// Returns the indices of every room placed under `node`.
fn connect_subtree(
    node: &PartitionNode,
    rooms: &[Room],
    rng: &mut RandomSource,
    hallways: &mut Vec<Hallway>,
) -> Vec<usize> {
    if node.is_leaf() {
        return node.room.into_iter().collect();
    }

    let mut left = match node.left.as_deref() {
        Some(child) => connect_subtree(child, rooms, rng, hallways),
        None => Vec::new(),
    };
    let right = match node.right.as_deref() {
        Some(child) => connect_subtree(child, rooms, rng, hallways),
        None => Vec::new(),
    };

    if let Some((from, to)) = closest_pair(&left, &right, rooms) {
        log::debug!("connecting room {from} to room {to} across {} pairs", left.len() * right.len());
        let horizontal_first = rng.coin_flip();
        hallways.push(build_hallway(rooms, from, to, horizontal_first));
    }

    left.extend(right);
    left
}

/// Exhaustive scan by center Manhattan distance; the first pair found wins ties.
fn closest_pair(left: &[usize], right: &[usize], rooms: &[Room]) -> Option<(usize, usize)> {
    let mut best: Option<(u32, usize, usize)> = None;
    for &a in left {
        for &b in right {
            let distance = rooms[a].center_distance(&rooms[b]);
            if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, a, b));
            }
        }
    }
    best.map(|(_, a, b)| (a, b))
}

pub fn build_hallway(rooms: &[Room], from: usize, to: usize, horizontal_first: bool) -> Hallway {
    let (a, b) = (&rooms[from], &rooms[to]);
    let path = l_shaped_path(a.center(), b.center(), horizontal_first)
        .into_iter()
        .filter(|&pos| !a.contains(pos) && !b.contains(pos))
        .collect();
    Hallway { path, rooms: (from, to) }
}

/// Ordered path from `start` to `end`: one straight run then the other.
pub fn l_shaped_path(start: Pos, end: Pos, horizontal_first: bool) -> Vec<Pos> {
    let corner =
        if horizontal_first { Pos { y: start.y, x: end.x } } else { Pos { y: end.y, x: start.x } };
    let mut path = straight_run(start, corner);
    path.extend(straight_run(corner, end).into_iter().skip(1));
    path
}

fn straight_run(from: Pos, to: Pos) -> Vec<Pos> {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let steps = from.x.abs_diff(to.x).max(from.y.abs_diff(to.y)) as i32;
    (0..=steps).map(|step| Pos { y: from.y + dy * step, x: from.x + dx * step }).collect()
}

//! Binary space partitioning of the map rectangle into leaf partitions.

use crate::rng::RandomSource;
use crate::types::Pos;

/// Above this aspect ratio the longer axis is always the one cut.
pub const SPLIT_ASPECT_THRESHOLD: f64 = 1.25;
pub const SPLIT_BAND_MIN: f64 = 0.35;
pub const SPLIT_BAND_MAX: f64 = 0.65;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    /// Cuts the width: `left` is west of `right`.
    Vertical,
    /// Cuts the height: `left` is north of `right`.
    Horizontal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionNode {
    pub origin: Pos,
    pub width: usize,
    pub height: usize,
    pub left: Option<Box<PartitionNode>>,
    pub right: Option<Box<PartitionNode>>,
    pub split: Option<SplitAxis>,
    /// Index into the level's room list; only leaves carry one.
    pub room: Option<usize>,
}

impl PartitionNode {
    fn leaf(origin: Pos, width: usize, height: usize) -> Self {
        Self { origin, width, height, left: None, right: None, split: None, room: None }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children().map(PartitionNode::leaf_count).sum()
    }

    pub fn depth(&self) -> u32 {
        self.children().map(|child| child.depth() + 1).max().unwrap_or(0)
    }

    pub fn children(&self) -> impl Iterator<Item = &PartitionNode> {
        self.left.as_deref().into_iter().chain(self.right.as_deref())
    }

    /// Leaves in left-to-right order.
    pub fn leaves_mut(&mut self) -> Vec<&mut PartitionNode> {
        let mut leaves = Vec::new();
        collect_leaves_mut(self, &mut leaves);
        leaves
    }
}

fn collect_leaves_mut<'a>(node: &'a mut PartitionNode, leaves: &mut Vec<&'a mut PartitionNode>) {
    if node.is_leaf() {
        leaves.push(node);
        return;
    }
    if let Some(left) = node.left.as_deref_mut() {
        collect_leaves_mut(left, leaves);
    }
    if let Some(right) = node.right.as_deref_mut() {
        collect_leaves_mut(right, leaves);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PartitionBounds {
    pub max_depth: u32,
    pub min_size: usize,
}

pub fn build_partition_tree(
    origin: Pos,
    width: usize,
    height: usize,
    bounds: PartitionBounds,
    rng: &mut RandomSource,
) -> PartitionNode {
    split_partition(origin, width, height, 0, bounds, rng)
}

fn split_partition(
    origin: Pos,
    width: usize,
    height: usize,
    depth: u32,
    bounds: PartitionBounds,
    rng: &mut RandomSource,
) -> PartitionNode {
    let mut node = PartitionNode::leaf(origin, width, height);
    if depth >= bounds.max_depth {
        return node;
    }

    let can_cut_width = width >= bounds.min_size * 2;
    let can_cut_height = height >= bounds.min_size * 2;
    let axis = match (can_cut_width, can_cut_height) {
        (false, false) => return node,
        (true, false) => SplitAxis::Vertical,
        (false, true) => SplitAxis::Horizontal,
        (true, true) => choose_axis(width, height, rng),
    };

    let length = match axis {
        SplitAxis::Vertical => width,
        SplitAxis::Horizontal => height,
    };
    let ratio = rng.range_f64(SPLIT_BAND_MIN, SPLIT_BAND_MAX);
    let cut = ((length as f64 * ratio) as usize).clamp(bounds.min_size, length - bounds.min_size);

    let (left, right) = match axis {
        SplitAxis::Vertical => (
            split_partition(origin, cut, height, depth + 1, bounds, rng),
            split_partition(
                Pos { y: origin.y, x: origin.x + cut as i32 },
                width - cut,
                height,
                depth + 1,
                bounds,
                rng,
            ),
        ),
        SplitAxis::Horizontal => (
            split_partition(origin, width, cut, depth + 1, bounds, rng),
            split_partition(
                Pos { y: origin.y + cut as i32, x: origin.x },
                width,
                height - cut,
                depth + 1,
                bounds,
                rng,
            ),
        ),
    };

    node.left = Some(Box::new(left));
    node.right = Some(Box::new(right));
    node.split = Some(axis);
    node
}

fn choose_axis(width: usize, height: usize, rng: &mut RandomSource) -> SplitAxis {
    let (width, height) = (width as f64, height as f64);
    if width / height > SPLIT_ASPECT_THRESHOLD {
        SplitAxis::Vertical
    } else if height / width > SPLIT_ASPECT_THRESHOLD {
        SplitAxis::Horizontal
    } else if rng.coin_flip() {
        SplitAxis::Vertical
    } else {
        SplitAxis::Horizontal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: PartitionBounds = PartitionBounds { max_depth: 5, min_size: 10 };

    fn leaf_rects(node: &PartitionNode, out: &mut Vec<(Pos, usize, usize)>) {
        if node.is_leaf() {
            out.push((node.origin, node.width, node.height));
        }
        for child in node.children() {
            leaf_rects(child, out);
        }
    }

    #[test]
    fn leaves_tile_the_root_without_gaps_or_overlap() {
        let mut rng = RandomSource::from_seed(1234);
        let tree = build_partition_tree(Pos::default(), 80, 45, BOUNDS, &mut rng);
        let mut leaves = Vec::new();
        leaf_rects(&tree, &mut leaves);

        let area: usize = leaves.iter().map(|&(_, w, h)| w * h).sum();
        assert_eq!(area, 80 * 45);

        let mut covered = vec![0_u8; 80 * 45];
        for (origin, w, h) in leaves {
            for y in origin.y as usize..origin.y as usize + h {
                for x in origin.x as usize..origin.x as usize + w {
                    covered[y * 80 + x] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&count| count == 1));
    }

    #[test]
    fn leaves_respect_minimum_size_and_depth() {
        let mut rng = RandomSource::from_seed(99);
        let tree = build_partition_tree(Pos::default(), 120, 60, BOUNDS, &mut rng);
        let mut leaves = Vec::new();
        leaf_rects(&tree, &mut leaves);
        assert!(leaves.iter().all(|&(_, w, h)| w >= 10 && h >= 10));
        assert!(tree.depth() <= BOUNDS.max_depth);
        assert_eq!(tree.leaf_count(), leaves.len());
    }

    #[test]
    fn internal_nodes_record_orientation_and_leaves_do_not() {
        let mut rng = RandomSource::from_seed(5);
        let tree = build_partition_tree(Pos::default(), 80, 45, BOUNDS, &mut rng);
        assert!(tree.split.is_some());
        let mut stack = vec![&tree];
        while let Some(node) = stack.pop() {
            assert_eq!(node.is_leaf(), node.split.is_none());
            stack.extend(node.children());
        }
    }

    #[test]
    fn wide_partitions_are_cut_vertically() {
        let mut rng = RandomSource::from_seed(3);
        let bounds = PartitionBounds { max_depth: 1, min_size: 10 };
        let tree = build_partition_tree(Pos::default(), 100, 30, bounds, &mut rng);
        assert_eq!(tree.split, Some(SplitAxis::Vertical));
        let left = tree.left.as_deref().expect("split root has children");
        assert!((35..=65).contains(&left.width));
    }

    #[test]
    fn too_small_partitions_stay_leaves() {
        let mut rng = RandomSource::from_seed(3);
        let tree = build_partition_tree(Pos::default(), 19, 19, BOUNDS, &mut rng);
        assert!(tree.is_leaf());
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use crate::common::collections::HashMap;
use crate::common::config::LayoutSettings;
use crate::geometry::{Point, Rect};
use crate::layout::graph::{Direction, Orientation, Placement};
use crate::model::tree::{NodeId, NodeMap};

/// Caller-assigned region identifier, unique within a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A node either splits into two children or holds one region, never both.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Split { orientation: Orientation, weight: f32 },
    Leaf { region: RegionId },
}

/// Shared partition-tree bookkeeping for every top-level subtree of a
/// display: the link arena plus node payloads, cached rectangles, and the
/// region index.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PartitionTree {
    pub(crate) map: NodeMap,
    kind: SecondaryMap<NodeId, NodeKind>,
    bounds: SecondaryMap<NodeId, Rect>,
    region_to_node: HashMap<RegionId, NodeId>,
}

impl PartitionTree {
    pub fn kind(&self, node: NodeId) -> NodeKind { self.kind[node] }

    pub fn node_of(&self, region: RegionId) -> Option<NodeId> {
        self.region_to_node.get(&region).copied()
    }

    pub fn region_of(&self, node: NodeId) -> Option<RegionId> {
        match self.kind[node] {
            NodeKind::Leaf { region } => Some(region),
            NodeKind::Split { .. } => None,
        }
    }

    pub fn contains_region(&self, region: RegionId) -> bool {
        self.region_to_node.contains_key(&region)
    }

    pub fn bounds(&self, node: NodeId) -> Option<Rect> { self.bounds.get(node).copied() }

    pub(crate) fn set_bounds(&mut self, node: NodeId, rect: Rect) {
        self.bounds.insert(node, rect);
    }

    pub fn root_of(&self, node: NodeId) -> NodeId { self.map.root_of(node) }

    pub(crate) fn make_leaf(&mut self, region: RegionId) -> NodeId {
        let node = self.map.mk_node();
        self.kind.insert(node, NodeKind::Leaf { region });
        self.region_to_node.insert(region, node);
        node
    }

    /// Frees a detached leaf and drops its region from the index.
    pub(crate) fn free_leaf(&mut self, node: NodeId) {
        if let NodeKind::Leaf { region } = self.kind[node] {
            self.region_to_node.remove(&region);
        }
        self.kind.remove(node);
        self.bounds.remove(node);
        self.map.remove(node);
    }

    /// Descends first children down to a leaf.
    pub fn first_leaf(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(child) = self.map.first_child(current) {
            current = child;
        }
        current
    }

    /// Recursive lookup of the leaf holding `region`, first child before
    /// second. A miss propagates up as `None`; callers probe each subtree.
    pub fn find_leaf(&self, node: NodeId, region: RegionId) -> Option<NodeId> {
        match self.kind[node] {
            NodeKind::Leaf { region: held } => (held == region).then_some(node),
            NodeKind::Split { .. } => {
                self.map.children(node).find_map(|child| self.find_leaf(child, region))
            }
        }
    }

    pub fn collect_regions_under(&self, node: NodeId, out: &mut Vec<RegionId>) {
        match self.kind[node] {
            NodeKind::Leaf { region } => out.push(region),
            NodeKind::Split { .. } => {
                for child in [self.map.first_child(node), self.map.second_child(node)] {
                    if let Some(child) = child {
                        self.collect_regions_under(child, out);
                    }
                }
            }
        }
    }

    /// Splits the leaf holding `relative` somewhere under `root` into a pair
    /// of leaves, the new one placed per `placement`. `weight` is stored as
    /// the first child's fraction. Returns the new region's node, or `None`
    /// when `relative` is not in this subtree.
    pub(crate) fn split(
        &mut self,
        root: NodeId,
        new: RegionId,
        relative: RegionId,
        placement: Placement,
        weight: f32,
    ) -> Option<NodeId> {
        let target = self.find_leaf(root, relative)?;
        Some(self.split_leaf(target, new, placement, weight))
    }

    fn split_leaf(&mut self, leaf: NodeId, new: RegionId, placement: Placement, weight: f32) -> NodeId {
        let NodeKind::Leaf { region: existing } = self.kind[leaf] else {
            panic!("split target {leaf:?} is not a leaf");
        };
        let kept = self.make_leaf(existing);
        let added = self.make_leaf(new);
        let (first, second) = if placement.new_region_first() { (added, kept) } else { (kept, added) };
        self.kind.insert(leaf, NodeKind::Split {
            orientation: placement.orientation(),
            weight,
        });
        self.map.set_children(leaf, first, second);
        added
    }

    /// Classic delete-and-merge: the sibling is rewired into the
    /// grandparent's child slot and the leaf plus its parent are freed.
    /// Returns the node now occupying the parent's position.
    pub(crate) fn splice_out(&mut self, leaf: NodeId) -> NodeId {
        let parent = self.map.parent(leaf).expect("splice_out needs a parented leaf");
        let sibling = self.map.sibling(leaf).expect("split node is missing a child");
        let grandparent = self.map.parent(parent);

        self.map.detach(leaf);
        self.map.detach(sibling);
        if let Some(grandparent) = grandparent {
            self.map.replace_child(grandparent, parent, sibling);
        } else {
            self.map.detach(parent);
        }

        self.free_leaf(leaf);
        self.kind.remove(parent);
        self.bounds.remove(parent);
        self.map.remove(parent);
        sibling
    }

    /// Stores `weight` on the parent split of `region`'s leaf, inverted when
    /// the leaf sits in the second child slot. No-op on unknown regions and
    /// on leaves without a parent.
    pub(crate) fn resize(&mut self, region: RegionId, weight: f32, settings: &LayoutSettings) -> bool {
        let Some(node) = self.node_of(region) else {
            return false;
        };
        let Some(parent) = self.map.parent(node) else {
            return false;
        };
        let requested = if self.map.is_first_child(node) { weight } else { 1.0 - weight };
        let stored = settings.clamp_weight(requested);
        let NodeKind::Split { weight: slot, .. } = &mut self.kind[parent] else {
            panic!("parent {parent:?} of a leaf is not a split");
        };
        *slot = stored;
        true
    }

    /// Containment walk from `node`; internal rectangles prune the descent.
    pub fn region_at(&self, node: NodeId, point: Point) -> Option<RegionId> {
        if !self.bounds.get(node)?.contains(point) {
            return None;
        }
        match self.kind[node] {
            NodeKind::Leaf { region } => Some(region),
            NodeKind::Split { .. } => {
                self.map.children(node).find_map(|child| self.region_at(child, point))
            }
        }
    }

    /// Nearest leaf in `direction`: ascend until a split of the matching
    /// orientation has a sibling on the wanted side, then descend to the
    /// closest leaf of that subtree.
    pub fn neighbor_of(&self, region: RegionId, direction: Direction) -> Option<RegionId> {
        let mut current = self.node_of(region)?;
        while let Some(parent) = self.map.parent(current) {
            if let NodeKind::Split { orientation, .. } = self.kind[parent] {
                if orientation == direction.orientation() {
                    let is_first = self.map.is_first_child(current);
                    let target = if direction.toward_first() {
                        if is_first { None } else { self.map.first_child(parent) }
                    } else if is_first {
                        self.map.second_child(parent)
                    } else {
                        None
                    };
                    if let Some(target) = target {
                        return self.region_of(self.closest_leaf(target, direction));
                    }
                }
            }
            current = parent;
        }
        None
    }

    fn closest_leaf(&self, node: NodeId, direction: Direction) -> NodeId {
        match self.kind[node] {
            NodeKind::Leaf { .. } => node,
            NodeKind::Split { orientation, .. } => {
                // entering against the split axis, the near side is the one
                // facing the origin of the move
                let child = if orientation == direction.orientation() && direction.toward_first() {
                    self.map.second_child(node)
                } else {
                    self.map.first_child(node)
                };
                match child {
                    Some(child) => self.closest_leaf(child, direction),
                    None => node,
                }
            }
        }
    }

    /// Exchanges the payloads of two leaves; node shapes and weights stay.
    pub(crate) fn swap_regions(&mut self, a: RegionId, b: RegionId) -> bool {
        if a == b {
            return false;
        }
        let (Some(node_a), Some(node_b)) = (self.node_of(a), self.node_of(b)) else {
            return false;
        };
        self.kind.insert(node_a, NodeKind::Leaf { region: b });
        self.kind.insert(node_b, NodeKind::Leaf { region: a });
        self.region_to_node.insert(a, node_b);
        self.region_to_node.insert(b, node_a);
        true
    }

    /// Flips the orientation of the nearest ancestor split.
    pub(crate) fn toggle_orientation(&mut self, region: RegionId) -> bool {
        let Some(node) = self.node_of(region) else {
            return false;
        };
        let mut current = self.map.parent(node);
        while let Some(candidate) = current {
            if let NodeKind::Split { orientation, .. } = &mut self.kind[candidate] {
                *orientation = orientation.flipped();
                return true;
            }
            current = self.map.parent(candidate);
        }
        false
    }

    pub fn draw_tree(&self, root: NodeId) -> String {
        fn write_node(tree: &PartitionTree, node: NodeId, out: &mut String, indent: usize) {
            for _ in 0..indent {
                out.push_str("  ");
            }
            match tree.kind[node] {
                NodeKind::Leaf { region } => {
                    out.push_str(&format!("Leaf {region}\n"));
                }
                NodeKind::Split { orientation, weight } => {
                    out.push_str(&format!("Split {orientation:?} {weight:.2}\n"));
                    for child in tree.map.children(node) {
                        write_node(tree, child, out, indent + 1);
                    }
                }
            }
        }
        let mut out = String::new();
        write_node(self, root, &mut out, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(id: u32) -> RegionId { RegionId(id) }

    fn tree_with_root(home: RegionId) -> (PartitionTree, NodeId) {
        let mut tree = PartitionTree::default();
        let root = tree.make_leaf(home);
        (tree, root)
    }

    #[test]
    fn split_converts_the_leaf_in_place() {
        let (mut tree, root) = tree_with_root(r(1));
        let added = tree.split(root, r(2), r(1), Placement::After, 0.3).unwrap();

        assert_eq!(tree.kind(root), NodeKind::Split {
            orientation: Orientation::Horizontal,
            weight: 0.3,
        });
        let first = tree.map.first_child(root).unwrap();
        let second = tree.map.second_child(root).unwrap();
        assert_eq!(tree.region_of(first), Some(r(1)));
        assert_eq!(tree.region_of(second), Some(r(2)));
        assert_eq!(second, added);
        assert_eq!(tree.node_of(r(1)), Some(first));
    }

    #[test]
    fn placement_controls_child_order_and_orientation() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::Above, 0.5).unwrap();

        let NodeKind::Split { orientation, .. } = tree.kind(root) else {
            panic!("expected a split");
        };
        assert_eq!(orientation, Orientation::Vertical);
        let first = tree.map.first_child(root).unwrap();
        assert_eq!(tree.region_of(first), Some(r(2)));
    }

    #[test]
    fn split_against_an_unknown_relative_is_a_quiet_miss() {
        let (mut tree, root) = tree_with_root(r(1));
        assert_eq!(tree.split(root, r(2), r(99), Placement::After, 0.5), None);
        assert!(!tree.contains_region(r(2)));
    }

    #[test]
    fn find_leaf_probes_the_first_child_first() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.5).unwrap();
        tree.split(root, r(3), r(1), Placement::Below, 0.5).unwrap();

        let found = tree.find_leaf(root, r(1)).unwrap();
        assert_eq!(tree.region_of(found), Some(r(1)));
        assert_eq!(tree.first_leaf(root), found);
    }

    #[test]
    fn splice_out_restores_the_original_shape() {
        let (mut tree, root) = tree_with_root(r(1));
        let added = tree.split(root, r(2), r(1), Placement::After, 0.3).unwrap();
        let spliced = tree.splice_out(added);

        assert_eq!(tree.region_of(spliced), Some(r(1)));
        assert_eq!(tree.map.parent(spliced), None);
        assert_eq!(tree.map.len(), 1);
        assert!(!tree.contains_region(r(2)));
    }

    #[test]
    fn splice_out_preserves_untouched_weights() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.3).unwrap();
        let added = tree.split(root, r(3), r(2), Placement::Below, 0.25).unwrap();
        tree.splice_out(added);

        assert_eq!(tree.kind(root), NodeKind::Split {
            orientation: Orientation::Horizontal,
            weight: 0.3,
        });
        let second = tree.map.second_child(root).unwrap();
        assert_eq!(tree.region_of(second), Some(r(2)));
    }

    #[test]
    fn resize_stores_the_complement_for_a_second_child() {
        let settings = LayoutSettings::default();
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.3).unwrap();

        assert!(tree.resize(r(2), 0.5, &settings));
        assert_eq!(tree.kind(root), NodeKind::Split {
            orientation: Orientation::Horizontal,
            weight: 0.5,
        });

        assert!(tree.resize(r(1), 0.2, &settings));
        assert_eq!(tree.kind(root), NodeKind::Split {
            orientation: Orientation::Horizontal,
            weight: 0.2,
        });
    }

    #[test]
    fn resize_misses_quietly() {
        let settings = LayoutSettings::default();
        let (mut tree, root) = tree_with_root(r(1));
        assert!(!tree.resize(r(42), 0.5, &settings));
        // a lone root leaf has no parent split to store the weight on
        assert!(!tree.resize(r(1), 0.5, &settings));
        assert_eq!(tree.kind(root), NodeKind::Leaf { region: r(1) });
    }

    #[test]
    fn resize_clamps_into_settings_bounds() {
        let settings = LayoutSettings::default();
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.5).unwrap();

        assert!(tree.resize(r(1), 0.999, &settings));
        assert_eq!(tree.kind(root), NodeKind::Split {
            orientation: Orientation::Horizontal,
            weight: 0.95,
        });
    }

    #[test]
    fn neighbor_lookup_crosses_nested_splits() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.5).unwrap();
        tree.split(root, r(3), r(2), Placement::Below, 0.5).unwrap();

        assert_eq!(tree.neighbor_of(r(1), Direction::Right), Some(r(2)));
        assert_eq!(tree.neighbor_of(r(3), Direction::Left), Some(r(1)));
        assert_eq!(tree.neighbor_of(r(3), Direction::Up), Some(r(2)));
        assert_eq!(tree.neighbor_of(r(1), Direction::Left), None);
    }

    #[test]
    fn swap_exchanges_payloads_only() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.3).unwrap();
        let first = tree.map.first_child(root).unwrap();

        assert!(tree.swap_regions(r(1), r(2)));
        assert_eq!(tree.region_of(first), Some(r(2)));
        assert_eq!(tree.node_of(r(1)), tree.map.second_child(root));
        assert!(!tree.swap_regions(r(1), r(1)));
        assert!(!tree.swap_regions(r(1), r(9)));
    }

    #[test]
    fn toggle_orientation_flips_the_nearest_split() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.5).unwrap();

        assert!(tree.toggle_orientation(r(2)));
        let NodeKind::Split { orientation, .. } = tree.kind(root) else {
            panic!("expected a split");
        };
        assert_eq!(orientation, Orientation::Vertical);
    }

    #[test]
    fn draw_tree_dumps_the_shape() {
        let (mut tree, root) = tree_with_root(r(1));
        tree.split(root, r(2), r(1), Placement::After, 0.3).unwrap();
        let dump = tree.draw_tree(root);
        assert_eq!(dump, "Split Horizontal 0.30\n  Leaf 1\n  Leaf 2\n");
    }
}

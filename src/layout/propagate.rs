use crate::geometry::Rect;
use crate::layout::graph::Orientation;
use crate::layout::partition::{NodeKind, PartitionTree};
use crate::model::tree::NodeId;

/// Recomputes every node rectangle under `root` from `content` downward,
/// splitting along each stored orientation and weight. Returns true when any
/// leaf rectangle actually changed. Pure over tree shape and weights, so
/// repeated calls without an intervening mutation settle to `false`.
pub(crate) fn propagate(tree: &mut PartitionTree, root: NodeId, content: Rect) -> bool {
    let mut changed = false;
    assign(tree, root, content, &mut changed);
    changed
}

fn assign(tree: &mut PartitionTree, node: NodeId, rect: Rect, changed: &mut bool) {
    match tree.kind(node) {
        NodeKind::Leaf { .. } => {
            if tree.bounds(node) != Some(rect) {
                *changed = true;
            }
            tree.set_bounds(node, rect);
        }
        NodeKind::Split { orientation, weight } => {
            tree.set_bounds(node, rect);
            let (first_rect, second_rect) = match orientation {
                Orientation::Horizontal => rect.split_horizontal(weight),
                Orientation::Vertical => rect.split_vertical(weight),
            };
            let first = tree.map.first_child(node).expect("split node without a first child");
            let second = tree.map.second_child(node).expect("split node without a second child");
            assign(tree, first, first_rect, changed);
            assign(tree, second, second_rect, changed);
        }
    }
}

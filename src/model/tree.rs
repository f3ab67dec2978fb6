use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

slotmap::new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct NodeLinks {
    parent: Option<NodeId>,
    first: Option<NodeId>,
    second: Option<NodeId>,
}

/// Binary node arena. Holds links only; payloads live in secondary maps
/// owned by the caller. Interior nodes always carry exactly two children,
/// so the child slots are a fixed pair rather than a sibling list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NodeMap {
    nodes: SlotMap<NodeId, NodeLinks>,
}

impl NodeMap {
    pub fn mk_node(&mut self) -> NodeId { self.nodes.insert(NodeLinks::default()) }

    pub fn contains(&self, node: NodeId) -> bool { self.nodes.contains_key(node) }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> { self.nodes[node].parent }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> { self.nodes[node].first }

    pub fn second_child(&self, node: NodeId) -> Option<NodeId> { self.nodes[node].second }

    /// First child, then second. Yields nothing for a childless node.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let links = self.nodes[node];
        links.first.into_iter().chain(links.second)
    }

    pub fn is_first_child(&self, node: NodeId) -> bool {
        self.parent(node).is_some_and(|p| self.nodes[p].first == Some(node))
    }

    pub fn sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let links = self.nodes[parent];
        if links.first == Some(node) { links.second } else { links.first }
    }

    /// Walks parent links up to the root of the subtree containing `node`.
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Attaches both children of a previously childless node at once.
    pub fn set_children(&mut self, parent: NodeId, first: NodeId, second: NodeId) {
        debug_assert!(self.nodes[parent].first.is_none() && self.nodes[parent].second.is_none());
        debug_assert!(self.nodes[first].parent.is_none());
        debug_assert!(self.nodes[second].parent.is_none());
        self.nodes[parent].first = Some(first);
        self.nodes[parent].second = Some(second);
        self.nodes[first].parent = Some(parent);
        self.nodes[second].parent = Some(parent);
    }

    /// Swaps `new` into the child slot currently holding `old`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        debug_assert!(self.nodes[new].parent.is_none());
        let links = &mut self.nodes[parent];
        if links.first == Some(old) {
            links.first = Some(new);
        } else if links.second == Some(old) {
            links.second = Some(new);
        } else {
            panic!("{old:?} is not a child of {parent:?}");
        }
        self.nodes[new].parent = Some(parent);
        self.nodes[old].parent = None;
    }

    /// Unlinks `node` from its parent, if any.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node].parent.take() else {
            return;
        };
        let links = &mut self.nodes[parent];
        if links.first == Some(node) {
            links.first = None;
        } else if links.second == Some(node) {
            links.second = None;
        }
    }

    /// Frees a fully detached, childless node.
    pub fn remove(&mut self, node: NodeId) {
        let links = self.nodes[node];
        debug_assert!(links.parent.is_none() && links.first.is_none() && links.second.is_none());
        self.nodes.remove(node);
    }

    pub fn preorder(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            let links = self.nodes[current];
            // push second first so the first child is visited first
            if let Some(second) = links.second {
                stack.push(second);
            }
            if let Some(first) = links.first {
                stack.push(first);
            }
        }
        out
    }
}

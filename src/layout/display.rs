use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::common::collections::{HashMap, HashSet};
use crate::common::config::LayoutSettings;
use crate::geometry::{Point, Rect};
use crate::layout::error::LayoutError;
use crate::layout::graph::{Direction, Placement};
use crate::layout::partition::{PartitionTree, RegionId};
use crate::layout::propagate;
use crate::model::tree::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub u32);

/// Profile whose secondary layout can be parked aside and restored later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub u32);

#[derive(Debug, Serialize, Deserialize)]
struct ParkedLayout {
    root: NodeId,
    history: Vec<RegionId>,
}

/// One physical or virtual screen: a forest of at most two partition roots,
/// a most-recently-used region history, and a non-removable home region.
///
/// Mutating methods assume the caller serializes access behind one
/// display-wide lock; the engine takes no locks of its own.
#[derive(Debug, Serialize, Deserialize)]
pub struct Display {
    id: DisplayId,
    /// Screen bounds minus system insets.
    content: Rect,
    tree: PartitionTree,
    /// Top-level roots, bottom to top; the last entry is hit-tested first.
    roots: Vec<NodeId>,
    /// Region ids ordered least- to most-recently used.
    history: Vec<RegionId>,
    home: RegionId,
    parked: HashMap<IdentityId, ParkedLayout>,
    settings: LayoutSettings,
    dirty: bool,
}

impl Display {
    pub fn new(id: DisplayId, content: Rect, home: RegionId, settings: LayoutSettings) -> Self {
        let mut tree = PartitionTree::default();
        let root = tree.make_leaf(home);
        debug!("created display {id:?} with home region {home} in {content:?}");
        Self {
            id,
            content,
            tree,
            roots: vec![root],
            history: vec![home],
            home,
            parked: HashMap::default(),
            settings,
            dirty: true,
        }
    }

    pub fn id(&self) -> DisplayId { self.id }

    pub fn home(&self) -> RegionId { self.home }

    pub fn content_bounds(&self) -> Rect { self.content }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    pub fn needs_propagate(&self) -> bool { self.dirty }

    /// Splits the leaf holding `relative` and places the new region next to
    /// it. `weight` is stored as the first child's share of the split.
    pub fn create_region(
        &mut self,
        new: RegionId,
        relative: RegionId,
        placement: Placement,
        weight: f32,
    ) -> Result<RegionId, LayoutError> {
        if !(0.0 < weight && weight < 1.0) {
            return Err(LayoutError::InvalidWeight(weight));
        }
        if self.tree.contains_region(new) {
            return Err(LayoutError::DuplicateRegion(new));
        }
        // roots probed bottom to top, first-child-first inside each
        for idx in 0..self.roots.len() {
            let root = self.roots[idx];
            if self.tree.split(root, new, relative, placement, weight).is_some() {
                self.history.push(new);
                self.dirty = true;
                debug!("created region {new} {placement:?} region {relative} on display {:?}", self.id);
                return Ok(new);
            }
        }
        warn!("create_region: relative region {relative} not found on display {:?}", self.id);
        Err(LayoutError::RegionNotFound(relative))
    }

    pub fn create_region_balanced(
        &mut self,
        new: RegionId,
        relative: RegionId,
        placement: Placement,
    ) -> Result<RegionId, LayoutError> {
        let weight = self.settings.default_split_weight;
        self.create_region(new, relative, placement, weight)
    }

    /// Adds a second top-level root holding `new`. A third top-level node is
    /// a caller bug and panics.
    pub fn create_top_level_region(
        &mut self,
        new: RegionId,
        front: bool,
    ) -> Result<RegionId, LayoutError> {
        if self.tree.contains_region(new) {
            return Err(LayoutError::DuplicateRegion(new));
        }
        assert!(
            self.roots.len() < 2,
            "display {:?} already has two top-level nodes",
            self.id
        );
        let root = self.tree.make_leaf(new);
        if front {
            self.roots.push(root);
        } else {
            self.roots.insert(0, root);
        }
        self.history.push(new);
        self.dirty = true;
        debug!("created top-level region {new} on display {:?}", self.id);
        Ok(new)
    }

    /// Removes a live region and splices its sibling up. Returns the region
    /// to receive focus, found by walking first children from the splice
    /// point, or `None` when `region` is unknown. Passing the home region is
    /// a caller bug and panics.
    pub fn remove_region(&mut self, region: RegionId) -> Option<RegionId> {
        assert!(region != self.home, "home region {region} is not removable");
        let node = self.tree.node_of(region)?;
        if !self.is_live(node) {
            warn!("remove_region({region}) targets a parked region");
            return None;
        }
        self.history.retain(|&r| r != region);
        self.dirty = true;
        let focus = match self.tree.map.parent(node) {
            Some(parent) => {
                let root_slot = self.roots.iter().position(|&r| r == parent);
                let spliced = self.tree.splice_out(node);
                if let Some(idx) = root_slot {
                    self.roots[idx] = spliced;
                }
                Some(self.tree.first_leaf(spliced))
            }
            None => {
                // sole leaf of a secondary top-level: drop the whole root
                let idx = self
                    .roots
                    .iter()
                    .position(|&r| r == node)
                    .expect("live leaf without a parent must be a top-level root");
                self.roots.remove(idx);
                self.tree.free_leaf(node);
                self.roots.last().map(|&root| self.tree.first_leaf(root))
            }
        };
        debug!("removed region {region} from display {:?}", self.id);
        focus.and_then(|leaf| self.tree.region_of(leaf))
    }

    /// Re-weights the split above the leaf holding `region`. False when the
    /// region is unknown, parked, or has no parent split.
    pub fn resize_region(&mut self, region: RegionId, weight: f32) -> bool {
        if self.live_node(region).is_none() {
            return false;
        }
        let resized = self.tree.resize(region, weight, &self.settings);
        if resized {
            self.dirty = true;
        }
        resized
    }

    pub fn set_content_bounds(&mut self, content: Rect) {
        if self.content != content {
            debug!("display {:?} content bounds now {content:?}", self.id);
            self.content = content;
            self.dirty = true;
        }
    }

    /// Reassigns every live node rectangle from the content rectangle
    /// downward. Returns true when any leaf rectangle changed.
    pub fn propagate(&mut self) -> bool {
        let mut changed = false;
        for &root in &self.roots {
            changed |= propagate::propagate(&mut self.tree, root, self.content);
        }
        self.dirty = false;
        changed
    }

    /// Hit test, topmost root first. Misses when the point is outside the
    /// content rectangle or the tree has not been propagated yet.
    pub fn region_at(&self, point: Point) -> Option<RegionId> {
        self.roots.iter().rev().find_map(|&root| self.tree.region_at(root, point))
    }

    /// Last-propagated bounds; resolves parked regions too.
    pub fn bounds_of(&self, region: RegionId) -> Option<Rect> {
        self.tree.bounds(self.tree.node_of(region)?)
    }

    pub fn contains_region(&self, region: RegionId) -> bool { self.live_node(region).is_some() }

    pub fn region_count(&self) -> usize {
        let mut regions = Vec::new();
        for &root in &self.roots {
            self.tree.collect_regions_under(root, &mut regions);
        }
        regions.len()
    }

    /// Marks `region` most recently used. Geometry is untouched.
    pub fn move_to_front(&mut self, region: RegionId) -> bool {
        if self.live_node(region).is_none() {
            error!("move_to_front({region}) on display {:?}: no such live region", self.id);
            return false;
        }
        self.history.retain(|&r| r != region);
        self.history.push(region);
        true
    }

    /// Live regions, most recently used first.
    pub fn recent_regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.history.iter().rev().copied()
    }

    pub fn most_recent(&self) -> Option<RegionId> { self.history.last().copied() }

    pub fn home_is_top(&self) -> bool { self.roots.last().copied() == Some(self.home_root()) }

    /// Reorders the home top-level within the z-order. Home stays in the
    /// top-level set no matter what.
    pub fn move_home_to_front(&mut self, front: bool) {
        let home_root = self.home_root();
        let idx = self
            .roots
            .iter()
            .position(|&r| r == home_root)
            .expect("home root missing from the top-level list");
        let root = self.roots.remove(idx);
        if front {
            self.roots.push(root);
        } else {
            self.roots.insert(0, root);
        }
    }

    /// Detaches the non-home top-level subtree and its history slice for
    /// `identity`, to be restored verbatim later. False when there is no
    /// secondary top-level or the identity already parked one.
    pub fn park_secondary(&mut self, identity: IdentityId) -> bool {
        if self.parked.contains_key(&identity) {
            warn!("identity {identity:?} already has a parked layout on display {:?}", self.id);
            return false;
        }
        let home_root = self.home_root();
        let Some(idx) = self.roots.iter().position(|&root| root != home_root) else {
            return false;
        };
        let root = self.roots.remove(idx);
        let mut regions = Vec::new();
        self.tree.collect_regions_under(root, &mut regions);
        let parked_set: HashSet<RegionId> = regions.into_iter().collect();
        let mut parked_history = Vec::new();
        self.history.retain(|&region| {
            if parked_set.contains(&region) {
                parked_history.push(region);
                false
            } else {
                true
            }
        });
        self.parked.insert(identity, ParkedLayout { root, history: parked_history });
        self.dirty = true;
        debug!("parked secondary top-level for identity {identity:?} on display {:?}", self.id);
        true
    }

    /// Reattaches a parked subtree as the topmost root and splices its
    /// history back in order.
    pub fn unpark_secondary(&mut self, identity: IdentityId) -> bool {
        let Some(parked) = self.parked.remove(&identity) else {
            return false;
        };
        assert!(
            self.roots.len() < 2,
            "display {:?} already has two top-level nodes",
            self.id
        );
        self.roots.push(parked.root);
        self.history.extend(parked.history);
        self.dirty = true;
        debug!("restored parked layout for identity {identity:?} on display {:?}", self.id);
        true
    }

    pub fn neighbor_of(&self, region: RegionId, direction: Direction) -> Option<RegionId> {
        self.live_node(region)?;
        self.tree.neighbor_of(region, direction)
    }

    /// Exchanges the payloads of two live leaves.
    pub fn swap_regions(&mut self, a: RegionId, b: RegionId) -> bool {
        if self.live_node(a).is_none() || self.live_node(b).is_none() {
            return false;
        }
        let swapped = self.tree.swap_regions(a, b);
        if swapped {
            self.dirty = true;
        }
        swapped
    }

    /// Flips the orientation of the split directly above `region`.
    pub fn toggle_orientation(&mut self, region: RegionId) -> bool {
        if self.live_node(region).is_none() {
            return false;
        }
        let toggled = self.tree.toggle_orientation(region);
        if toggled {
            self.dirty = true;
        }
        toggled
    }

    pub fn draw_tree(&self) -> String {
        let mut out = String::new();
        for (idx, &root) in self.roots.iter().enumerate() {
            out.push_str(&format!("top-level {idx}\n"));
            out.push_str(&self.tree.draw_tree(root));
        }
        out
    }

    fn home_root(&self) -> NodeId {
        let node = self.tree.node_of(self.home).expect("home region is missing from the tree");
        self.tree.root_of(node)
    }

    fn is_live(&self, node: NodeId) -> bool {
        let root = self.tree.root_of(node);
        self.roots.contains(&root)
    }

    fn live_node(&self, region: RegionId) -> Option<NodeId> {
        let node = self.tree.node_of(region)?;
        self.is_live(node).then_some(node)
    }
}

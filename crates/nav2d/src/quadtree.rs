//! Region quadtree over element bounding rectangles
//!
//! Each element's rect is stored at the deepest node whose quadrant fully
//! contains it; rects crossing a split line stay at the parent. Nodes live
//! in an arena and children are created lazily on insert. A side table maps
//! every element to its owning node for O(1) removal without back-pointers.
//!
//! Query traversal is depth-first with a fixed child order (top-left,
//! top-right, bottom-left, bottom-right), so results come back in a stable
//! order for reproducible builds.

use crate::element::ElementId;
use nav2d_common::{Error, Rect, Result};
use std::collections::HashMap;

const NO_NODE: u32 = u32::MAX;

/// Subdivision stops once a quadrant side would shrink below this
const MIN_QUADRANT_SIDE: f32 = 1.0;

#[derive(Debug)]
struct Node {
    rect: Rect,
    items: Vec<(ElementId, Rect)>,
    /// Children in top-left, top-right, bottom-left, bottom-right order
    children: [u32; 4],
}

impl Node {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            items: Vec::new(),
            children: [NO_NODE; 4],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Location {
    node: u32,
    rect: Rect,
}

/// AABB spatial index for navigation elements
#[derive(Debug)]
pub struct QuadTree {
    nodes: Vec<Node>,
    locations: HashMap<ElementId, Location>,
}

impl QuadTree {
    /// Creates an index covering `world` (callers pass the scaled-up world rect)
    pub fn new(world: Rect) -> Result<Self> {
        if world.is_degenerate() {
            return Err(Error::DegenerateBounds(
                "quadtree world rect has zero extent".to_string(),
            ));
        }
        Ok(Self {
            nodes: vec![Node::new(world)],
            locations: HashMap::new(),
        })
    }

    /// The rectangle covered by the root node
    pub fn world_rect(&self) -> Rect {
        self.nodes[0].rect
    }

    /// Number of indexed elements
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// True when the element is currently indexed
    pub fn contains(&self, id: ElementId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Inserts an element with the given bounds
    ///
    /// Fails with [`Error::DegenerateBounds`] on zero-extent rects. An
    /// already-present element is reinserted at its new position.
    pub fn insert(&mut self, id: ElementId, rect: Rect) -> Result<()> {
        if rect.is_degenerate() {
            return Err(Error::DegenerateBounds(format!(
                "element rect has zero extent: {rect:?}"
            )));
        }
        self.remove(id);

        let mut node = 0u32;
        loop {
            let node_rect = self.nodes[node as usize].rect;
            let half_w = node_rect.width * 0.5;
            let half_h = node_rect.height * 0.5;
            if half_w.min(half_h) < MIN_QUADRANT_SIDE {
                break;
            }
            let mut next = NO_NODE;
            for qi in 0..4 {
                let quadrant = Self::quadrant(&node_rect, qi);
                if quadrant.contains_rect(&rect) {
                    next = self.child(node, qi, quadrant);
                    break;
                }
            }
            if next == NO_NODE {
                break;
            }
            node = next;
        }

        self.nodes[node as usize].items.push((id, rect));
        self.locations.insert(id, Location { node, rect });
        Ok(())
    }

    /// Removes an element; returns true iff it was present
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(location) = self.locations.remove(&id) else {
            return false;
        };
        let items = &mut self.nodes[location.node as usize].items;
        if let Some(pos) = items.iter().position(|(i, _)| *i == id) {
            items.remove(pos);
        }
        true
    }

    /// Moves an element to new bounds (remove + insert)
    pub fn relocate(&mut self, id: ElementId, rect: Rect) -> Result<()> {
        self.remove(id);
        self.insert(id, rect)
    }

    /// Collects every element whose bounds intersect `rect` into `out`
    ///
    /// `out` is cleared first; an empty query rect yields an empty result.
    pub fn query_intersecting(&self, rect: &Rect, out: &mut Vec<ElementId>) {
        out.clear();
        if rect.is_degenerate() {
            return;
        }
        self.query_node(0, rect, out);
    }

    /// Short-circuiting variant of [`QuadTree::query_intersecting`]
    pub fn any_intersecting(&self, rect: &Rect) -> bool {
        if rect.is_degenerate() {
            return false;
        }
        self.any_node(0, rect)
    }

    /// Drops all nodes and side-table entries, keeping the world rect
    pub fn clear(&mut self) {
        let world = self.nodes[0].rect;
        self.nodes.clear();
        self.nodes.push(Node::new(world));
        self.locations.clear();
    }

    /// Replaces the world rectangle and reindexes every known element
    pub fn set_world_rect(&mut self, world: Rect) -> Result<()> {
        if world.is_degenerate() {
            return Err(Error::DegenerateBounds(
                "quadtree world rect has zero extent".to_string(),
            ));
        }
        let mut entries: Vec<(ElementId, Rect)> = self
            .locations
            .iter()
            .map(|(id, loc)| (*id, loc.rect))
            .collect();
        entries.sort_by_key(|(id, _)| *id);

        self.nodes.clear();
        self.nodes.push(Node::new(world));
        self.locations.clear();
        for (id, rect) in entries {
            self.insert(id, rect)?;
        }
        Ok(())
    }

    fn child(&mut self, node: u32, qi: usize, quadrant: Rect) -> u32 {
        let existing = self.nodes[node as usize].children[qi];
        if existing != NO_NODE {
            return existing;
        }
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node::new(quadrant));
        self.nodes[node as usize].children[qi] = idx;
        idx
    }

    fn quadrant(rect: &Rect, qi: usize) -> Rect {
        let half_w = rect.width * 0.5;
        let half_h = rect.height * 0.5;
        match qi {
            // top-left
            0 => Rect::new(rect.x, rect.y + half_h, half_w, half_h),
            // top-right
            1 => Rect::new(rect.x + half_w, rect.y + half_h, half_w, half_h),
            // bottom-left
            2 => Rect::new(rect.x, rect.y, half_w, half_h),
            // bottom-right
            _ => Rect::new(rect.x + half_w, rect.y, half_w, half_h),
        }
    }

    fn query_node(&self, node: u32, rect: &Rect, out: &mut Vec<ElementId>) {
        let n = &self.nodes[node as usize];
        for (id, item_rect) in &n.items {
            if item_rect.intersects(rect) {
                out.push(*id);
            }
        }
        for child in n.children {
            if child != NO_NODE && self.nodes[child as usize].rect.intersects(rect) {
                self.query_node(child, rect, out);
            }
        }
    }

    fn any_node(&self, node: u32, rect: &Rect) -> bool {
        let n = &self.nodes[node as usize];
        if n.items.iter().any(|(_, r)| r.intersects(rect)) {
            return true;
        }
        for child in n.children {
            if child != NO_NODE
                && self.nodes[child as usize].rect.intersects(rect)
                && self.any_node(child, rect)
            {
                return true;
            }
        }
        false
    }
}

//! Derived polygon contour trees
//!
//! A [`NavShape`] is one node of the contour tree produced by the boolean
//! engine for a group: an outer contour or a hole, linked to its parent and
//! children. Nodes live in a [`ShapeArena`] owned by the group and are
//! addressed by index, so the parent/child cycle needs no reference
//! counting and a rebuild is a plain truncate.

use nav2d_common::Vec2;

/// Whether a shape was derived from obstacles or from a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavType {
    Obstacle,
    Surface,
}

/// Index of a shape inside its group's arena
pub type ShapeId = u32;

/// Sentinel for "no parent" (top-level contour)
pub const NO_SHAPE: ShapeId = u32::MAX;

/// A node in a polygon contour tree
#[derive(Debug, Clone)]
pub struct NavShape {
    /// Ordered ring of vertices
    pub points: Vec<Vec2>,
    /// True when this contour is a hole in its parent
    pub hole: bool,
    /// Parent shape, `NO_SHAPE` for top-level contours
    pub parent: ShapeId,
    /// Child shapes (holes of an outer contour)
    pub children: Vec<ShapeId>,
    /// Kind of element set this shape was derived from
    pub nav_type: NavType,
}

/// Arena storage for the shapes of one group
#[derive(Debug, Default)]
pub struct ShapeArena {
    nodes: Vec<NavShape>,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all shapes; indices from previous builds become invalid
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&NavShape> {
        self.nodes.get(id as usize)
    }

    /// Adds a top-level contour and returns its id
    pub fn push_contour(&mut self, points: Vec<Vec2>, nav_type: NavType) -> ShapeId {
        let id = self.nodes.len() as ShapeId;
        self.nodes.push(NavShape {
            points,
            hole: false,
            parent: NO_SHAPE,
            children: Vec::new(),
            nav_type,
        });
        id
    }

    /// Adds a hole under `parent` and returns its id
    pub fn push_hole(&mut self, parent: ShapeId, points: Vec<Vec2>, nav_type: NavType) -> ShapeId {
        let id = self.nodes.len() as ShapeId;
        self.nodes.push(NavShape {
            points,
            hole: true,
            parent,
            children: Vec::new(),
            nav_type,
        });
        self.nodes[parent as usize].children.push(id);
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &NavShape)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i as ShapeId, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_links() {
        let mut arena = ShapeArena::new();
        let outer = arena.push_contour(
            vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            NavType::Obstacle,
        );
        let hole = arena.push_hole(
            outer,
            vec![Vec2::ZERO, Vec2::Y, Vec2::X],
            NavType::Obstacle,
        );

        let o = arena.get(outer).unwrap();
        assert!(!o.hole);
        assert_eq!(o.parent, NO_SHAPE);
        assert_eq!(o.children, vec![hole]);

        let h = arena.get(hole).unwrap();
        assert!(h.hole);
        assert_eq!(h.parent, outer);

        let mut arena = arena;
        arena.clear();
        assert!(arena.is_empty());
        assert!(arena.get(outer).is_none());
    }
}

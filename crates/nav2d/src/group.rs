//! Connected-component groups of mutually overlapping elements
//!
//! An [`ElementGroup`] holds the member sets of one connected component of
//! the AABB-overlap graph and the boolean results derived from them: the
//! union of its obstacles and the difference of each surface against those
//! obstacles, stored as contour trees in a shape arena.

use crate::clip::{self, ClipShape};
use crate::element::{ElementId, NavElement};
use crate::shape::{NavType, ShapeArena, ShapeId};
use nav2d_common::{IntPoint, Result, Vec2};
use std::collections::{BTreeMap, BTreeSet};

/// Identity of a group; `NONE` means "not a member of any group"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u32);

impl GroupId {
    pub const NONE: GroupId = GroupId(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// One connected component and its derived shapes
#[derive(Debug)]
pub struct ElementGroup {
    id: GroupId,
    obstacles: BTreeSet<ElementId>,
    surfaces: BTreeSet<ElementId>,
    shapes: ShapeArena,
    nav_obstacles: Vec<ShapeId>,
    nav_surfaces: Vec<ShapeId>,
}

impl ElementGroup {
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            obstacles: BTreeSet::new(),
            surfaces: BTreeSet::new(),
            shapes: ShapeArena::new(),
            nav_obstacles: Vec::new(),
            nav_surfaces: Vec::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn obstacles(&self) -> &BTreeSet<ElementId> {
        &self.obstacles
    }

    pub fn surfaces(&self) -> &BTreeSet<ElementId> {
        &self.surfaces
    }

    pub fn len(&self) -> usize {
        self.obstacles.len() + self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.surfaces.is_empty()
    }

    /// All member ids, obstacles first
    pub fn member_ids(&self) -> Vec<ElementId> {
        self.obstacles
            .iter()
            .chain(self.surfaces.iter())
            .copied()
            .collect()
    }

    /// The shape arena of the last rebuild
    pub fn shapes(&self) -> &ShapeArena {
        &self.shapes
    }

    /// Top-level contours derived from the obstacle union
    pub fn nav_obstacles(&self) -> &[ShapeId] {
        &self.nav_obstacles
    }

    /// Top-level contours derived from surface differences
    pub fn nav_surfaces(&self) -> &[ShapeId] {
        &self.nav_surfaces
    }

    #[cfg(test)]
    pub(crate) fn shapes_mut(&mut self) -> &mut ShapeArena {
        &mut self.shapes
    }

    #[cfg(test)]
    pub(crate) fn nav_obstacles_mut(&mut self) -> &mut Vec<ShapeId> {
        &mut self.nav_obstacles
    }

    pub(crate) fn add(&mut self, id: ElementId, nav_type: NavType) {
        match nav_type {
            NavType::Obstacle => self.obstacles.insert(id),
            NavType::Surface => self.surfaces.insert(id),
        };
    }

    /// Reconstructs the derived shapes from the current members
    ///
    /// The previous build's shapes are discarded. Fast paths: a single
    /// obstacle ring and surfaces without any obstacle are taken verbatim
    /// from the elements' world points; everything else goes through the
    /// boolean engine on the integer world rings.
    pub(crate) fn rebuild(
        &mut self,
        elements: &BTreeMap<ElementId, NavElement>,
        factor: f32,
    ) -> Result<()> {
        self.shapes.clear();
        self.nav_obstacles.clear();
        self.nav_surfaces.clear();

        let obstacle_elems: Vec<&NavElement> = self
            .obstacles
            .iter()
            .filter_map(|id| elements.get(id))
            .collect();
        let obstacle_rings: Vec<Vec<IntPoint>> = obstacle_elems
            .iter()
            .map(|e| e.int_world_points().to_vec())
            .collect();

        match obstacle_elems.as_slice() {
            [] => {}
            [single] => {
                let sid = self
                    .shapes
                    .push_contour(single.world_points().to_vec(), NavType::Obstacle);
                self.nav_obstacles.push(sid);
            }
            _ => {
                let shapes = clip::union(&obstacle_rings)?;
                self.store_shapes(shapes, NavType::Obstacle, factor);
            }
        }

        let surface_ids: Vec<ElementId> = self.surfaces.iter().copied().collect();
        for id in surface_ids {
            let Some(e) = elements.get(&id) else {
                continue;
            };
            if obstacle_rings.is_empty() {
                let sid = self
                    .shapes
                    .push_contour(e.world_points().to_vec(), NavType::Surface);
                self.nav_surfaces.push(sid);
            } else {
                let shapes = clip::difference(e.int_world_points(), &obstacle_rings)?;
                self.store_shapes(shapes, NavType::Surface, factor);
            }
        }

        log::debug!(
            "group {} rebuilt: {} obstacle contours, {} surface contours",
            self.id,
            self.nav_obstacles.len(),
            self.nav_surfaces.len()
        );
        Ok(())
    }

    fn store_shapes(&mut self, shapes: Vec<ClipShape>, nav_type: NavType, factor: f32) {
        for shape in shapes {
            let outer = int_ring_to_vec2(&shape.outer, factor);
            let sid = self.shapes.push_contour(outer, nav_type);
            match nav_type {
                NavType::Obstacle => self.nav_obstacles.push(sid),
                NavType::Surface => self.nav_surfaces.push(sid),
            }
            for hole in &shape.holes {
                self.shapes
                    .push_hole(sid, int_ring_to_vec2(hole, factor), nav_type);
            }
        }
    }
}

fn int_ring_to_vec2(ring: &[IntPoint], factor: f32) -> Vec<Vec2> {
    ring.iter().map(|p| p.to_vec2(factor)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav2d_common::approx_eq;

    const FACTOR: f32 = 100.0;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ]
    }

    fn square_of(half: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
    }

    fn refreshed(
        id: u64,
        nav_type: NavType,
        points: Vec<Vec2>,
        position: Vec2,
    ) -> (ElementId, NavElement) {
        let eid = ElementId(id);
        let mut e =
            NavElement::new(eid, nav_type, points, position, 0.0, 1.0, 0.0).unwrap();
        e.refresh_geometry(0.0, FACTOR).unwrap();
        (eid, e)
    }

    #[test]
    fn test_single_obstacle_fast_path() {
        let (eid, e) = refreshed(1, NavType::Obstacle, unit_square(), Vec2::ZERO);
        let mut elements = BTreeMap::new();
        elements.insert(eid, e);

        let mut g = ElementGroup::new(GroupId(1));
        g.add(eid, NavType::Obstacle);
        g.rebuild(&elements, FACTOR).unwrap();

        assert_eq!(g.nav_obstacles().len(), 1);
        assert!(g.nav_surfaces().is_empty());
        let shape = g.shapes().get(g.nav_obstacles()[0]).unwrap();
        assert_eq!(shape.points.len(), 4);
        assert!(!shape.hole);
    }

    #[test]
    fn test_surfaces_without_obstacles_fast_path() {
        let (a, ea) = refreshed(1, NavType::Surface, unit_square(), Vec2::ZERO);
        let (b, eb) = refreshed(2, NavType::Surface, unit_square(), Vec2::new(0.5, 0.0));
        let mut elements = BTreeMap::new();
        elements.insert(a, ea);
        elements.insert(b, eb);

        let mut g = ElementGroup::new(GroupId(1));
        g.add(a, NavType::Surface);
        g.add(b, NavType::Surface);
        g.rebuild(&elements, FACTOR).unwrap();

        // One shape per surface, no boolean pass
        assert_eq!(g.nav_surfaces().len(), 2);
        assert!(g.nav_obstacles().is_empty());
    }

    #[test]
    fn test_two_obstacles_union() {
        let (a, ea) = refreshed(1, NavType::Obstacle, unit_square(), Vec2::ZERO);
        let (b, eb) = refreshed(2, NavType::Obstacle, unit_square(), Vec2::new(0.5, 0.0));
        let mut elements = BTreeMap::new();
        elements.insert(a, ea);
        elements.insert(b, eb);

        let mut g = ElementGroup::new(GroupId(1));
        g.add(a, NavType::Obstacle);
        g.add(b, NavType::Obstacle);
        g.rebuild(&elements, FACTOR).unwrap();

        assert_eq!(g.nav_obstacles().len(), 1);
        let shape = g.shapes().get(g.nav_obstacles()[0]).unwrap();
        // Union of the two overlapping unit squares is a 1.5 x 1 rectangle
        assert_eq!(shape.points.len(), 4);
        let min_x = shape.points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = shape.points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((min_x + 0.5).abs() < 0.02);
        assert!((max_x - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_surface_clipped_by_obstacle_gets_hole() {
        let (s, es) = refreshed(1, NavType::Surface, square_of(2.0), Vec2::ZERO);
        let (o, eo) = refreshed(2, NavType::Obstacle, unit_square(), Vec2::ZERO);
        let mut elements = BTreeMap::new();
        elements.insert(s, es);
        elements.insert(o, eo);

        let mut g = ElementGroup::new(GroupId(1));
        g.add(s, NavType::Surface);
        g.add(o, NavType::Obstacle);
        g.rebuild(&elements, FACTOR).unwrap();

        assert_eq!(g.nav_obstacles().len(), 1);
        assert_eq!(g.nav_surfaces().len(), 1);

        let surface = g.shapes().get(g.nav_surfaces()[0]).unwrap();
        assert_eq!(surface.children.len(), 1);
        let hole = g.shapes().get(surface.children[0]).unwrap();
        assert!(hole.hole);
        assert_eq!(hole.parent, g.nav_surfaces()[0]);
        assert_eq!(hole.points.len(), 4);
        assert!(hole
            .points
            .iter()
            .any(|p| approx_eq(*p, Vec2::new(0.5, 0.5), 0.02)));
    }

    #[test]
    fn test_membership_and_member_order() {
        let mut g = ElementGroup::new(GroupId(3));
        assert!(g.is_empty());
        g.add(ElementId(2), NavType::Surface);
        g.add(ElementId(1), NavType::Obstacle);
        assert_eq!(g.len(), 2);
        // Obstacles first, then surfaces
        assert_eq!(g.member_ids(), vec![ElementId(1), ElementId(2)]);
        assert_eq!(g.obstacles().len(), 1);
        assert_eq!(g.surfaces().len(), 1);
    }
}

//! Authored navigation elements
//!
//! A [`NavElement`] is one authored convex polygon with a pose, an extra
//! offset and a movement cost (surfaces only). The element owns its derived
//! caches: the inflated local ring, the transformed world ring, the integer
//! world ring for the boolean engines, and the bounding box. Caches are
//! rewritten in place on refresh; they are only reallocated when the vertex
//! count of their source changes.

use crate::group::GroupId;
use crate::offset::offset_ring;
use crate::shape::NavType;
use nav2d_common::{rotate_about_origin, validate_ring, Aabb, IntPoint, Rect, Result, Vec2};

/// Stable handle of an authored element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One authored polygon with pose, offset and derived caches
#[derive(Debug)]
pub struct NavElement {
    id: ElementId,
    nav_type: NavType,
    cost: f32,
    original_points: Vec<Vec2>,
    position: Vec2,
    rotation: f32,
    extra_offset: f32,

    extended_points: Vec<Vec2>,
    world_points: Vec<Vec2>,
    int_world_points: Vec<IntPoint>,
    aabb: Aabb,
    rect: Rect,

    dirty: bool,
    extend_dirty: bool,
    group_id: GroupId,
    in_quadtree: bool,
}

impl NavElement {
    /// Validates the authored ring and creates a fully-dirty element
    pub(crate) fn new(
        id: ElementId,
        nav_type: NavType,
        points: Vec<Vec2>,
        position: Vec2,
        rotation: f32,
        cost: f32,
        extra_offset: f32,
    ) -> Result<Self> {
        validate_ring(&points)?;
        Ok(Self {
            id,
            nav_type,
            cost,
            original_points: points,
            position,
            rotation,
            extra_offset: extra_offset.max(0.0),
            extended_points: Vec::new(),
            world_points: Vec::new(),
            int_world_points: Vec::new(),
            aabb: Aabb::empty(),
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            dirty: true,
            extend_dirty: true,
            group_id: GroupId::NONE,
            in_quadtree: false,
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn nav_type(&self) -> NavType {
        self.nav_type
    }

    /// Movement cost; defined only for surfaces
    pub fn cost(&self) -> Option<f32> {
        match self.nav_type {
            NavType::Surface => Some(self.cost),
            NavType::Obstacle => None,
        }
    }

    pub fn original_points(&self) -> &[Vec2] {
        &self.original_points
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn extra_offset(&self) -> f32 {
        self.extra_offset
    }

    /// Inflated ring in local coordinates; valid while not dirty
    pub fn extended_points(&self) -> &[Vec2] {
        &self.extended_points
    }

    /// Inflated ring in world coordinates; valid while not dirty
    pub fn world_points(&self) -> &[Vec2] {
        &self.world_points
    }

    /// Bounding box snapshot of the world ring
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Bounding rectangle snapshot of the world ring
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn int_world_points(&self) -> &[IntPoint] {
        &self.int_world_points
    }

    pub(crate) fn in_quadtree(&self) -> bool {
        self.in_quadtree
    }

    pub(crate) fn set_in_quadtree(&mut self, value: bool) {
        self.in_quadtree = value;
    }

    pub(crate) fn set_group_id(&mut self, group_id: GroupId) {
        self.group_id = group_id;
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    pub(crate) fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub(crate) fn set_extra_offset(&mut self, extra_offset: f32) {
        self.extra_offset = extra_offset.max(0.0);
        self.dirty = true;
        self.extend_dirty = true;
    }

    pub(crate) fn set_cost(&mut self, cost: f32) {
        self.cost = cost;
    }

    /// Recomputes every cache from the authored ring, pose and offsets
    ///
    /// Idempotent: a clean element is left untouched. The caller sequences
    /// quadtree and group maintenance around this.
    pub(crate) fn refresh_geometry(&mut self, agent_radius: f32, factor: f32) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if self.extend_dirty {
            let int_ring: Vec<IntPoint> = self
                .original_points
                .iter()
                .map(|p| IntPoint::from_vec2(*p, factor))
                .collect();
            let distance = ((agent_radius + self.extra_offset) * factor) as f64;
            let inflated = offset_ring(&int_ring, distance)?;
            self.extended_points.clear();
            self.extended_points
                .extend(inflated.into_iter().map(|p| p.to_vec2(factor)));
            self.extend_dirty = false;
        }

        self.world_points.clear();
        let mut aabb = Aabb::empty();
        for p in &self.extended_points {
            let world = rotate_about_origin(*p, self.rotation) + self.position;
            aabb.expand_point(world);
            self.world_points.push(world);
        }
        self.aabb = aabb;
        self.rect = aabb.rect();

        self.int_world_points.clear();
        self.int_world_points
            .extend(self.world_points.iter().map(|p| IntPoint::from_vec2(*p, factor)));

        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav2d_common::{approx_eq, EPSILON};
    use std::f32::consts::FRAC_PI_4;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ]
    }

    fn element(position: Vec2, rotation: f32) -> NavElement {
        NavElement::new(
            ElementId(1),
            NavType::Obstacle,
            unit_square(),
            position,
            rotation,
            0.0,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_ring() {
        let mut cw = unit_square();
        cw.reverse();
        assert!(NavElement::new(
            ElementId(1),
            NavType::Obstacle,
            cw,
            Vec2::ZERO,
            0.0,
            0.0,
            0.0
        )
        .is_err());
    }

    #[test]
    fn test_refresh_inflates_and_transforms() {
        let mut e = element(Vec2::new(2.0, 1.0), 0.0);
        e.refresh_geometry(0.5, 100.0).unwrap();
        assert!(!e.is_dirty());

        // Inflated to a 2x2 square, then translated
        assert_eq!(e.world_points().len(), 4);
        assert!(approx_eq(e.world_points()[0], Vec2::new(1.0, 0.0), 0.02));
        assert!(approx_eq(e.world_points()[2], Vec2::new(3.0, 2.0), 0.02));

        let aabb = e.aabb();
        assert!(approx_eq(aabb.min, Vec2::new(1.0, 0.0), 0.02));
        assert!(approx_eq(aabb.max, Vec2::new(3.0, 2.0), 0.02));
    }

    #[test]
    fn test_rotation_grows_aabb() {
        let mut e = element(Vec2::ZERO, FRAC_PI_4);
        e.refresh_geometry(0.0, 100.0).unwrap();
        // A quarter-turned unit square spans sqrt(2) on both axes
        let aabb = e.aabb();
        let expected = (2.0f32).sqrt() * 0.5;
        assert!((aabb.max.x - expected).abs() < 0.02);
        assert!((aabb.max.y - expected).abs() < 0.02);
    }

    #[test]
    fn test_extra_offset_adds_to_inflation() {
        let mut e = element(Vec2::ZERO, 0.0);
        e.set_extra_offset(0.25);
        e.refresh_geometry(0.25, 100.0).unwrap();
        assert!(approx_eq(e.world_points()[2], Vec2::new(1.0, 1.0), 0.02));
    }

    #[test]
    fn test_move_back_round_trips_world_points() {
        let mut e = element(Vec2::ZERO, 0.0);
        e.refresh_geometry(0.5, 100.0).unwrap();
        let before: Vec<Vec2> = e.world_points().to_vec();
        let aabb_before = e.aabb();

        e.set_position(Vec2::new(3.0, 0.0));
        e.refresh_geometry(0.5, 100.0).unwrap();
        e.set_position(Vec2::ZERO);
        e.refresh_geometry(0.5, 100.0).unwrap();

        assert_eq!(e.world_points(), &before[..]);
        assert_eq!(e.aabb(), aabb_before);
    }

    #[test]
    fn test_cost_only_for_surfaces() {
        let e = element(Vec2::ZERO, 0.0);
        assert_eq!(e.cost(), None);
        let s = NavElement::new(
            ElementId(2),
            NavType::Surface,
            unit_square(),
            Vec2::ZERO,
            0.0,
            2.5,
            0.0,
        )
        .unwrap();
        assert_eq!(s.cost(), Some(2.5));
    }

    #[test]
    fn test_refresh_is_idempotent_when_clean() {
        let mut e = element(Vec2::ZERO, 0.0);
        e.refresh_geometry(0.5, 100.0).unwrap();
        let before: Vec<Vec2> = e.world_points().to_vec();
        e.refresh_geometry(0.5, 100.0).unwrap();
        assert_eq!(e.world_points(), &before[..]);
        assert!(approx_eq(
            e.world_points()[0],
            Vec2::new(-1.0, -1.0),
            EPSILON + 0.02
        ));
    }
}

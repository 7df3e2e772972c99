//! Navigation mesh facade
//!
//! [`Nav2d`] owns every element, group, the spatial index and the graph,
//! and is the single mutation surface. Edits only flip dirty state; all
//! derived data settles in [`Nav2d::update`], which runs the pipeline
//! phases in order: refresh dirty elements, regroup, rebuild affected
//! groups, rebuild the graph. Observers see either the pre-update or the
//! post-update state, never an intermediate.

use crate::config::Nav2dConfig;
use crate::element::{ElementId, NavElement};
use crate::graph::{ConnectionData, NavGraph, NavPoint};
use crate::group::{ElementGroup, GroupId};
use crate::grouping::{dismantle_group, drain_regroup, RegroupState};
use crate::quadtree::QuadTree;
use crate::shape::NavType;
use nav2d_common::{Accuracy, Result, Vec2};
use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::FRAC_PI_6;

/// Incrementally maintained 2D navigation mesh
pub struct Nav2d {
    config: Nav2dConfig,
    elements: BTreeMap<ElementId, NavElement>,
    groups: BTreeMap<GroupId, ElementGroup>,
    quadtree: QuadTree,
    graph: NavGraph,
    dirty_elements: BTreeSet<ElementId>,
    next_element_id: u64,
    next_group_id: u32,
    update_counter: u64,
}

impl Nav2d {
    /// Creates a navigation mesh for the configured world
    ///
    /// The spatial index covers the authored world rectangle scaled about
    /// its centre by 2x, so elements sitting at the world edge still fit.
    pub fn new(config: Nav2dConfig) -> Result<Self> {
        config.validate()?;
        let quadtree = QuadTree::new(config.world_rect().scaled_about_center(2.0))?;
        Ok(Self {
            config,
            elements: BTreeMap::new(),
            groups: BTreeMap::new(),
            quadtree,
            graph: NavGraph::new(),
            dirty_elements: BTreeSet::new(),
            next_element_id: 1,
            next_group_id: 1,
            update_counter: 0,
        })
    }

    /// Convenience constructor from corners, radius and accuracy
    pub fn with_bounds(
        world_min: Vec2,
        world_max: Vec2,
        agent_radius: f32,
        accuracy: Accuracy,
    ) -> Result<Self> {
        Self::new(
            Nav2dConfig::new(world_min, world_max)
                .with_agent_radius(agent_radius)
                .with_accuracy(accuracy),
        )
    }

    pub fn config(&self) -> &Nav2dConfig {
        &self.config
    }

    /// Adds an impassable convex polygon
    pub fn add_obstacle(
        &mut self,
        points: Vec<Vec2>,
        position: Vec2,
        rotation: f32,
    ) -> Result<ElementId> {
        self.add_element(NavType::Obstacle, points, position, rotation, 0.0, 0.0)
    }

    /// Adds an impassable convex polygon with an extra inflation distance
    pub fn add_obstacle_with_offset(
        &mut self,
        points: Vec<Vec2>,
        position: Vec2,
        rotation: f32,
        extra_offset: f32,
    ) -> Result<ElementId> {
        self.add_element(
            NavType::Obstacle,
            points,
            position,
            rotation,
            0.0,
            extra_offset,
        )
    }

    /// Adds a disc-shaped obstacle, approximated by its circumscribed
    /// regular hexagon rotated by 30 degrees
    pub fn add_obstacle_disc(&mut self, radius: f32, position: Vec2) -> Result<ElementId> {
        self.add_obstacle(disc_hexagon(radius), position, 0.0)
    }

    pub fn add_obstacle_disc_with_offset(
        &mut self,
        radius: f32,
        position: Vec2,
        extra_offset: f32,
    ) -> Result<ElementId> {
        self.add_obstacle_with_offset(disc_hexagon(radius), position, 0.0, extra_offset)
    }

    /// Adds a passable convex polygon with a movement cost
    pub fn add_surface(
        &mut self,
        points: Vec<Vec2>,
        position: Vec2,
        rotation: f32,
        cost: f32,
    ) -> Result<ElementId> {
        self.add_element(NavType::Surface, points, position, rotation, cost, 0.0)
    }

    pub fn add_surface_with_offset(
        &mut self,
        points: Vec<Vec2>,
        position: Vec2,
        rotation: f32,
        cost: f32,
        extra_offset: f32,
    ) -> Result<ElementId> {
        self.add_element(NavType::Surface, points, position, rotation, cost, extra_offset)
    }

    /// Adds a disc-shaped surface, approximated like
    /// [`Nav2d::add_obstacle_disc`]
    pub fn add_surface_disc(
        &mut self,
        radius: f32,
        position: Vec2,
        cost: f32,
    ) -> Result<ElementId> {
        self.add_surface(disc_hexagon(radius), position, 0.0, cost)
    }

    pub fn add_surface_disc_with_offset(
        &mut self,
        radius: f32,
        position: Vec2,
        cost: f32,
        extra_offset: f32,
    ) -> Result<ElementId> {
        self.add_surface_with_offset(disc_hexagon(radius), position, 0.0, cost, extra_offset)
    }

    fn add_element(
        &mut self,
        nav_type: NavType,
        points: Vec<Vec2>,
        position: Vec2,
        rotation: f32,
        cost: f32,
        extra_offset: f32,
    ) -> Result<ElementId> {
        let id = ElementId(self.next_element_id);
        let element = NavElement::new(id, nav_type, points, position, rotation, cost, extra_offset)?;
        self.next_element_id += 1;
        self.elements.insert(id, element);
        self.dirty_elements.insert(id);
        log::debug!("added {nav_type:?} element {id}");
        Ok(id)
    }

    /// Moves an element; returns false when the id is unknown
    pub fn set_position(&mut self, id: ElementId, position: Vec2) -> bool {
        let Some(e) = self.elements.get_mut(&id) else {
            return false;
        };
        e.set_position(position);
        self.dirty_elements.insert(id);
        true
    }

    /// Rotates an element; returns false when the id is unknown
    pub fn set_rotation(&mut self, id: ElementId, rotation: f32) -> bool {
        let Some(e) = self.elements.get_mut(&id) else {
            return false;
        };
        e.set_rotation(rotation);
        self.dirty_elements.insert(id);
        true
    }

    /// Moves and rotates an element in one edit
    pub fn set_pose(&mut self, id: ElementId, position: Vec2, rotation: f32) -> bool {
        let Some(e) = self.elements.get_mut(&id) else {
            return false;
        };
        e.set_position(position);
        e.set_rotation(rotation);
        self.dirty_elements.insert(id);
        true
    }

    /// Changes the extra inflation distance (clamped to non-negative)
    pub fn set_extra_offset(&mut self, id: ElementId, extra_offset: f32) -> bool {
        let Some(e) = self.elements.get_mut(&id) else {
            return false;
        };
        e.set_extra_offset(extra_offset);
        self.dirty_elements.insert(id);
        true
    }

    /// Changes the movement cost of a surface; geometry is unaffected
    pub fn set_cost(&mut self, id: ElementId, cost: f32) -> bool {
        match self.elements.get_mut(&id) {
            Some(e) if e.nav_type() == NavType::Surface => {
                e.set_cost(cost);
                true
            }
            _ => false,
        }
    }

    /// Removes an element and settles immediately
    ///
    /// Idempotent: removing an unknown id is a no-op returning false.
    pub fn remove_nav_element(&mut self, id: ElementId) -> Result<bool> {
        let Some(element) = self.elements.remove(&id) else {
            return Ok(false);
        };
        self.quadtree.remove(id);
        self.dirty_elements.remove(&id);

        let mut state = RegroupState::new();
        if !element.group_id().is_none() {
            dismantle_group(
                element.group_id(),
                &mut self.elements,
                &mut self.groups,
                &mut state,
            );
        }
        self.settle(&mut state)?;
        log::debug!("removed element {id}");
        Ok(true)
    }

    /// Settles every pending edit and returns the refreshed element ids
    ///
    /// Does nothing when no element is dirty, so calling it twice in a row
    /// is a no-op.
    pub fn update(&mut self) -> Result<Vec<ElementId>> {
        if self.dirty_elements.is_empty() {
            return Ok(Vec::new());
        }

        let factor = self.config.accuracy.factor();
        let agent_radius = self.config.agent_radius;
        let dirty: Vec<ElementId> = std::mem::take(&mut self.dirty_elements)
            .into_iter()
            .collect();

        let mut state = RegroupState::new();
        let mut refreshed = Vec::with_capacity(dirty.len());
        for id in dirty {
            let Some(e) = self.elements.get_mut(&id) else {
                continue;
            };
            if !e.is_dirty() {
                continue;
            }
            e.refresh_geometry(agent_radius, factor)?;
            let rect = e.rect();
            let indexed = e.in_quadtree();
            let old_group = e.group_id();

            if indexed {
                self.quadtree.relocate(id, rect)?;
            } else {
                self.quadtree.insert(id, rect)?;
                if let Some(e) = self.elements.get_mut(&id) {
                    e.set_in_quadtree(true);
                }
            }

            // A refreshed element may have bridged or severed its old
            // component; requeue all of it.
            if !old_group.is_none() {
                dismantle_group(old_group, &mut self.elements, &mut self.groups, &mut state);
            }
            state.enqueue(id);
            refreshed.push(id);
        }

        self.settle(&mut state)?;
        Ok(refreshed)
    }

    /// Regroup, rebuild marked groups, rebuild the graph
    fn settle(&mut self, state: &mut RegroupState) -> Result<()> {
        if !state.has_changes() {
            return Ok(());
        }

        drain_regroup(
            &mut self.elements,
            &mut self.groups,
            &self.quadtree,
            &mut self.next_group_id,
            state,
        );

        let factor = self.config.accuracy.factor();
        for gid in state.rebuild_ids() {
            if let Some(group) = self.groups.get_mut(gid) {
                group.rebuild(&self.elements, factor)?;
            }
        }

        self.graph.rebuild(self.groups.iter());
        self.update_counter += 1;
        log::info!(
            "navigation mesh settled (update {}, {} elements, {} groups, {} points)",
            self.update_counter,
            self.elements.len(),
            self.groups.len(),
            self.graph.point_count()
        );
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> Option<&NavElement> {
        self.elements.get(&id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &NavElement> {
        self.elements.values()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &NavElement> {
        self.elements
            .values()
            .filter(|e| e.nav_type() == NavType::Obstacle)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &NavElement> {
        self.elements
            .values()
            .filter(|e| e.nav_type() == NavType::Surface)
    }

    pub fn group(&self, id: GroupId) -> Option<&ElementGroup> {
        self.groups.get(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &ElementGroup> {
        self.groups.values()
    }

    pub fn nav_point(&self, id: u32) -> Option<&NavPoint> {
        self.graph.point(id)
    }

    pub fn nav_points(&self) -> impl Iterator<Item = &NavPoint> {
        self.graph.points()
    }

    pub fn connections(&self) -> impl Iterator<Item = (&(u32, u32), &ConnectionData)> {
        self.graph.connections()
    }

    /// The co-polygon peers of a navigation point
    pub fn forbidden_connections(&self, point_id: u32) -> Option<&[u32]> {
        self.graph.forbidden_connections(point_id)
    }

    /// Counters describing the current mesh state
    pub fn statistics(&self) -> Nav2dStatistics {
        Nav2dStatistics {
            element_count: self.elements.len(),
            obstacle_count: self.obstacles().count(),
            surface_count: self.surfaces().count(),
            group_count: self.groups.len(),
            nav_point_count: self.graph.point_count(),
            connection_count: self.graph.connection_count(),
            update_counter: self.update_counter,
        }
    }
}

/// Statistics about a navigation mesh instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nav2dStatistics {
    pub element_count: usize,
    pub obstacle_count: usize,
    pub surface_count: usize,
    pub group_count: usize,
    pub nav_point_count: usize,
    pub connection_count: usize,
    /// Increments once per settling pass that changed anything
    pub update_counter: u64,
}

/// Regular hexagon circumscribing a disc of the given radius, rotated by
/// 30 degrees, counter-clockwise
fn disc_hexagon(radius: f32) -> Vec<Vec2> {
    let circumradius = radius / FRAC_PI_6.cos();
    (0..6)
        .map(|k| {
            let angle = FRAC_PI_6 + k as f32 * 2.0 * FRAC_PI_6;
            Vec2::from_angle(angle) * circumradius
        })
        .collect()
}

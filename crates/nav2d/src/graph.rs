//! Navigation graph built from group contour trees
//!
//! Every contour vertex becomes a [`NavPoint`]; consecutive ring vertices
//! become neighbours and one canonical connection. Points on the same
//! polygon share a forbidden set, which later pathfinding uses to avoid
//! drawing chords across the polygon; holes join the forbidden set of the
//! contour they puncture. Forbidden sets live in an arena on the graph and
//! points hold an index into it, so no sets are shared by reference.

use crate::group::{ElementGroup, GroupId};
use crate::shape::ShapeId;
use nav2d_common::Vec2;
use std::collections::{BTreeMap, VecDeque};

/// A graph vertex placed on a contour vertex
#[derive(Debug, Clone)]
pub struct NavPoint {
    id: u32,
    position: Vec2,
    neighbours: Vec<u32>,
    forbidden_set: u32,
}

impl NavPoint {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Ids of the ring neighbours of this point
    pub fn neighbours(&self) -> &[u32] {
        &self.neighbours
    }
}

/// Data attached to one undirected connection
#[derive(Debug, Clone, Copy)]
pub struct ConnectionData {
    /// Lower endpoint id
    pub a: u32,
    /// Higher endpoint id
    pub b: u32,
    /// Euclidean length of the edge
    pub length: f32,
}

/// The edge-point graph over all groups
#[derive(Debug, Default)]
pub struct NavGraph {
    points: BTreeMap<u32, NavPoint>,
    connections: BTreeMap<(u32, u32), ConnectionData>,
    forbidden_sets: Vec<Vec<u32>>,
    next_point_id: u32,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn point(&self, id: u32) -> Option<&NavPoint> {
        self.points.get(&id)
    }

    pub fn points(&self) -> impl Iterator<Item = &NavPoint> {
        self.points.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = (&(u32, u32), &ConnectionData)> {
        self.connections.iter()
    }

    pub fn connection(&self, a: u32, b: u32) -> Option<&ConnectionData> {
        self.connections.get(&canonical_key(a, b))
    }

    /// The co-polygon peers of a point, itself included
    pub fn forbidden_connections(&self, id: u32) -> Option<&[u32]> {
        let point = self.points.get(&id)?;
        self.forbidden_sets
            .get(point.forbidden_set as usize)
            .map(|s| s.as_slice())
    }

    /// Rebuilds the whole graph from the groups' current shapes
    pub(crate) fn rebuild<'a>(
        &mut self,
        groups: impl Iterator<Item = (&'a GroupId, &'a ElementGroup)>,
    ) {
        self.points.clear();
        self.connections.clear();
        self.forbidden_sets.clear();

        for (_, group) in groups {
            // Surfaces expose only their outer rings; surface holes
            // coincide with obstacle contours that are emitted below.
            for &sid in group.nav_surfaces() {
                if let Some(shape) = group.shapes().get(sid) {
                    let set = self.new_forbidden_set();
                    self.emit_ring(&shape.points, set);
                }
            }

            // Obstacles walk the contour tree breadth-first; holes share
            // the forbidden set of the contour they puncture.
            let mut pending: VecDeque<(ShapeId, Option<u32>)> = group
                .nav_obstacles()
                .iter()
                .map(|&sid| (sid, None))
                .collect();
            while let Some((sid, parent_set)) = pending.pop_front() {
                let Some(shape) = group.shapes().get(sid) else {
                    continue;
                };
                let set = match (shape.hole, parent_set) {
                    (true, Some(parent)) => parent,
                    _ => self.new_forbidden_set(),
                };
                self.emit_ring(&shape.points, set);
                for &child in &shape.children {
                    pending.push_back((child, Some(set)));
                }
            }
        }
    }

    fn new_forbidden_set(&mut self) -> u32 {
        self.forbidden_sets.push(Vec::new());
        (self.forbidden_sets.len() - 1) as u32
    }

    fn emit_ring(&mut self, ring: &[Vec2], forbidden_set: u32) {
        let n = ring.len();
        if n < 3 {
            log::debug!("skipping contour with {n} vertices");
            return;
        }

        let first = self.next_point_id;
        self.next_point_id += n as u32;

        for (i, position) in ring.iter().enumerate() {
            let id = first + i as u32;
            let prev = first + ((i + n - 1) % n) as u32;
            let next = first + ((i + 1) % n) as u32;
            self.points.insert(
                id,
                NavPoint {
                    id,
                    position: *position,
                    neighbours: vec![prev, next],
                    forbidden_set,
                },
            );
            self.forbidden_sets[forbidden_set as usize].push(id);

            let key = canonical_key(id, next);
            let length = (ring[(i + 1) % n] - *position).length();
            self.connections.insert(
                key,
                ConnectionData {
                    a: key.0,
                    b: key.1,
                    length,
                },
            );
        }
    }
}

fn canonical_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::NavType;

    fn square_ring(half: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
    }

    fn graph_for(groups: &BTreeMap<GroupId, ElementGroup>) -> NavGraph {
        let mut graph = NavGraph::new();
        graph.rebuild(groups.iter());
        graph
    }

    fn obstacle_group(id: u32) -> ElementGroup {
        ElementGroup::new(GroupId(id))
    }

    #[test]
    fn test_ring_is_a_cycle() {
        let mut group = obstacle_group(1);
        let sid = group
            .shapes_mut()
            .push_contour(square_ring(1.0), NavType::Obstacle);
        group.nav_obstacles_mut().push(sid);
        let mut groups = BTreeMap::new();
        groups.insert(GroupId(1), group);

        let graph = graph_for(&groups);
        assert_eq!(graph.point_count(), 4);
        assert_eq!(graph.connection_count(), 4);

        for p in graph.points() {
            assert_eq!(p.neighbours().len(), 2);
            for n in p.neighbours() {
                assert!(graph.connection(p.id(), *n).is_some());
            }
        }
    }

    #[test]
    fn test_connection_keys_are_canonical() {
        let mut group = obstacle_group(1);
        let sid = group
            .shapes_mut()
            .push_contour(square_ring(1.0), NavType::Obstacle);
        group.nav_obstacles_mut().push(sid);
        let mut groups = BTreeMap::new();
        groups.insert(GroupId(1), group);

        let graph = graph_for(&groups);
        for ((a, b), data) in graph.connections() {
            assert!(a < b);
            assert_eq!((data.a, data.b), (*a, *b));
            assert!(data.length > 0.0);
        }
    }

    #[test]
    fn test_hole_shares_forbidden_set_with_parent() {
        let mut group = obstacle_group(1);
        let outer = group
            .shapes_mut()
            .push_contour(square_ring(2.0), NavType::Obstacle);
        group
            .shapes_mut()
            .push_hole(outer, square_ring(1.0), NavType::Obstacle);
        group.nav_obstacles_mut().push(outer);
        let mut groups = BTreeMap::new();
        groups.insert(GroupId(1), group);

        let graph = graph_for(&groups);
        assert_eq!(graph.point_count(), 8);

        // All eight points share one forbidden set
        let first = graph.points().next().unwrap().id();
        let set = graph.forbidden_connections(first).unwrap().to_vec();
        assert_eq!(set.len(), 8);
        for p in graph.points() {
            assert_eq!(graph.forbidden_connections(p.id()).unwrap(), &set[..]);
        }
    }

    #[test]
    fn test_separate_contours_get_separate_sets() {
        let mut group = obstacle_group(1);
        let a = group
            .shapes_mut()
            .push_contour(square_ring(1.0), NavType::Obstacle);
        let b = group
            .shapes_mut()
            .push_contour(square_ring(1.0), NavType::Obstacle);
        group.nav_obstacles_mut().push(a);
        group.nav_obstacles_mut().push(b);
        let mut groups = BTreeMap::new();
        groups.insert(GroupId(1), group);

        let graph = graph_for(&groups);
        assert_eq!(graph.point_count(), 8);
        let ids: Vec<u32> = graph.points().map(|p| p.id()).collect();
        let set_a = graph.forbidden_connections(ids[0]).unwrap();
        assert_eq!(set_a.len(), 4);
        let other = ids.iter().find(|i| !set_a.contains(i)).unwrap();
        assert_eq!(graph.forbidden_connections(*other).unwrap().len(), 4);
    }

    #[test]
    fn test_point_ids_stay_monotonic_across_rebuilds() {
        let mut group = obstacle_group(1);
        let sid = group
            .shapes_mut()
            .push_contour(square_ring(1.0), NavType::Obstacle);
        group.nav_obstacles_mut().push(sid);
        let mut groups = BTreeMap::new();
        groups.insert(GroupId(1), group);

        let mut graph = NavGraph::new();
        graph.rebuild(groups.iter());
        let max_first: u32 = graph.points().map(|p| p.id()).max().unwrap();
        graph.rebuild(groups.iter());
        let min_second: u32 = graph.points().map(|p| p.id()).min().unwrap();
        assert!(min_second > max_first);
    }
}

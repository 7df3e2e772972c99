//! Incrementally maintained 2D navigation mesh
//!
//! This crate builds and maintains a navigation mesh over a bounded planar
//! world populated by convex polygonal obstacles (impassable) and surfaces
//! (passable, with a movement cost). Every authored polygon is inflated by
//! the agent radius so a point agent can traverse the mesh without clipping
//! the original shapes. Overlapping elements are grouped per connected
//! component of the AABB-overlap graph; each group unions its obstacles and
//! clips its surfaces against them, and the resulting contour rings feed an
//! edge-point graph for pathfinding.
//!
//! Edits (add, move, rotate, re-offset, remove) only mark state dirty; the
//! single [`Nav2d::update`] call settles everything, keeping work
//! proportional to the size of the change.
//!
//! # Example
//!
//! ```rust,no_run
//! use nav2d::{Nav2d, Nav2dConfig};
//! use nav2d_common::{Accuracy, Vec2};
//!
//! # fn example() -> nav2d_common::Result<()> {
//! let config = Nav2dConfig::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0))
//!     .with_agent_radius(0.5)
//!     .with_accuracy(Accuracy::Hundred);
//! let mut nav = Nav2d::new(config)?;
//!
//! // A square pillar and a walkable gravel patch around it
//! let pillar = nav.add_obstacle(
//!     vec![
//!         Vec2::new(-1.0, -1.0),
//!         Vec2::new(1.0, -1.0),
//!         Vec2::new(1.0, 1.0),
//!         Vec2::new(-1.0, 1.0),
//!     ],
//!     Vec2::new(3.0, 0.0),
//!     0.0,
//! )?;
//! nav.add_surface_disc(6.0, Vec2::ZERO, 2.0)?;
//!
//! // Settle and inspect the produced graph
//! nav.update()?;
//! println!("{} navigation points", nav.statistics().nav_point_count);
//!
//! // Move the pillar and settle again; only its component is rebuilt
//! nav.set_position(pillar, Vec2::new(-3.0, 0.0));
//! nav.update()?;
//! # Ok(())
//! # }
//! ```

pub mod clip;
pub mod config;
pub mod element;
pub mod graph;
pub mod group;
mod grouping;
pub mod nav2d;
pub mod offset;
pub mod quadtree;
pub mod shape;


// Re-export main types
pub use crate::config::Nav2dConfig;
pub use crate::element::{ElementId, NavElement};
pub use crate::graph::{ConnectionData, NavGraph, NavPoint};
pub use crate::group::{ElementGroup, GroupId};
pub use crate::nav2d::{Nav2d, Nav2dStatistics};
pub use crate::quadtree::QuadTree;
pub use crate::shape::{NavShape, NavType, ShapeArena, ShapeId, NO_SHAPE};

// Re-export the shared primitives alongside the facade
pub use nav2d_common::{Aabb, Accuracy, Error, IntPoint, Rect, Result, Vec2};

//! Common utilities and data structures shared by the nav2d crates

mod aabb;
mod int_point;
mod polygon;
mod vector;

pub use aabb::*;
pub use int_point::*;
pub use polygon::*;
pub use vector::*;

/// Represents a 2D position
pub type Vec2 = glam::Vec2;

/// Tolerance used by approximate float comparisons throughout the library
pub const EPSILON: f32 = 1e-5;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid world bounds: {0}")]
    InvalidWorld(String),

    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("degenerate bounds: {0}")]
    DegenerateBounds(String),

    #[error("geometry engine failure: {0}")]
    EngineFailure(String),
}

/// Result type for nav2d operations
pub type Result<T> = std::result::Result<T, Error>;

//! Vector utilities for 2D navigation geometry

use crate::EPSILON;
use glam::Vec2;

/// Z-component of the 3D cross product of two 2D vectors
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Normalised perpendicular (counter-clockwise skew) of a vector
///
/// Returns `None` when the input has no usable direction.
pub fn perp(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    if len < EPSILON {
        return None;
    }
    Some(v.perp() / len)
}

/// Rotates a point about the origin by `angle` radians
#[inline]
pub fn rotate_about_origin(p: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(p)
}

/// Checks two points for approximate equality
#[inline]
pub fn approx_eq(a: Vec2, b: Vec2, eps: f32) -> bool {
    a.abs_diff_eq(b, eps)
}

//! Polygon validation for authored navigation elements
//!
//! Authored polygons must be convex, counter-clockwise and non-degenerate.
//! Failing any check is fatal to element construction.

use crate::{cross, Error, Result, EPSILON};
use glam::Vec2;

/// Validates an authored polygon ring
///
/// Checks, in order: vertex count (at least 3), winding of the first corner
/// (counter-clockwise, not colinear), and convexity over every consecutive
/// vertex triple. Colinear triples inside the ring are tolerated.
pub fn validate_ring(points: &[Vec2]) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::InvalidPolygon(format!(
            "expected at least 3 vertices, got {}",
            points.len()
        )));
    }

    let seed = cross(points[1] - points[0], points[2] - points[1]);
    if seed.abs() < EPSILON {
        return Err(Error::InvalidPolygon(
            "first corner is colinear".to_string(),
        ));
    }
    if seed < 0.0 {
        return Err(Error::InvalidPolygon(
            "clockwise winding, expected counter-clockwise".to_string(),
        ));
    }

    let n = points.len();
    let mut has_positive = false;
    let mut has_negative = false;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let z = cross(b - a, c - b);
        if z > EPSILON {
            has_positive = true;
        } else if z < -EPSILON {
            has_negative = true;
        }
        if has_positive && has_negative {
            return Err(Error::InvalidPolygon("polygon is not convex".to_string()));
        }
    }

    Ok(())
}

/// Signed area of a polygon ring, positive for counter-clockwise winding
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

//! Polygon offset engine
//!
//! Inflates a closed convex counter-clockwise ring of integer points by a
//! signed distance using miter joins: every edge is pushed outward along
//! its normal and consecutive offset lines are intersected. Convex input
//! guarantees the raw miter ring is already simple, so no self-intersection
//! trimming pass is needed and exactly one output ring is produced.

use nav2d_common::{Error, IntPoint, Result};

/// Cross products below this magnitude treat consecutive edges as colinear
const COLINEAR_EPS: f64 = 1e-9;

/// Offsets a convex counter-clockwise ring by `distance` (integer units)
///
/// A non-negative distance inflates the ring. Zero distance returns the
/// input unchanged. Fails with [`Error::EngineFailure`] on rings with fewer
/// than 3 vertices or with zero-length edges.
pub fn offset_ring(ring: &[IntPoint], distance: f64) -> Result<Vec<IntPoint>> {
    if ring.len() < 3 {
        return Err(Error::EngineFailure(format!(
            "offset subject has {} vertices, expected at least 3",
            ring.len()
        )));
    }

    if distance == 0.0 {
        return Ok(ring.to_vec());
    }

    let n = ring.len();

    // Phase A: per-edge direction and outward normal. For a CCW ring the
    // interior lies to the left of each edge, so the outward normal is the
    // right-hand perpendicular (dy, -dx).
    let mut dirs = Vec::with_capacity(n);
    let mut normals = Vec::with_capacity(n);
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let dx = (b.x - a.x) as f64;
        let dy = (b.y - a.y) as f64;
        let len = (dx * dx + dy * dy).sqrt();
        if len < COLINEAR_EPS {
            return Err(Error::EngineFailure(
                "offset subject has a zero-length edge".to_string(),
            ));
        }
        dirs.push((dx, dy));
        normals.push((dy / len, -dx / len));
    }

    // Phase B: each output vertex is the intersection of the offset lines
    // of the two edges meeting at the original vertex.
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let p = ring[i];

        let (q1x, q1y) = (
            p.x as f64 + normals[prev].0 * distance,
            p.y as f64 + normals[prev].1 * distance,
        );
        let (q2x, q2y) = (
            p.x as f64 + normals[i].0 * distance,
            p.y as f64 + normals[i].1 * distance,
        );
        let (d1x, d1y) = dirs[prev];
        let (d2x, d2y) = dirs[i];

        let denom = d1x * d2y - d1y * d2x;
        let (vx, vy) = if denom.abs() < COLINEAR_EPS {
            // Colinear edges share their offset line; push the vertex straight out
            (q2x, q2y)
        } else {
            let t = ((q2x - q1x) * d2y - (q2y - q1y) * d2x) / denom;
            (q1x + d1x * t, q1y + d1y * t)
        };

        out.push(IntPoint::new(
            vx.round_ties_even() as i64,
            vy.round_ties_even() as i64,
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: i64) -> Vec<IntPoint> {
        vec![
            IntPoint::new(-half, -half),
            IntPoint::new(half, -half),
            IntPoint::new(half, half),
            IntPoint::new(-half, half),
        ]
    }

    #[test]
    fn test_square_inflation() {
        // Unit square at accuracy 100, inflated by half a unit
        let out = offset_ring(&square(50), 50.0).unwrap();
        assert_eq!(out, square(100));
    }

    #[test]
    fn test_zero_distance_is_identity() {
        let ring = square(50);
        assert_eq!(offset_ring(&ring, 0.0).unwrap(), ring);
    }

    #[test]
    fn test_colinear_vertex_pushed_straight_out() {
        let ring = vec![
            IntPoint::new(-50, -50),
            IntPoint::new(0, -50),
            IntPoint::new(50, -50),
            IntPoint::new(50, 50),
            IntPoint::new(-50, 50),
        ];
        let out = offset_ring(&ring, 10.0).unwrap();
        assert_eq!(out.len(), ring.len());
        assert_eq!(out[1], IntPoint::new(0, -60));
        assert_eq!(out[3], IntPoint::new(60, 60));
    }

    #[test]
    fn test_triangle_miter_extends_past_edges() {
        let ring = vec![
            IntPoint::new(0, 0),
            IntPoint::new(100, 0),
            IntPoint::new(0, 100),
        ];
        let out = offset_ring(&ring, 10.0).unwrap();
        assert_eq!(out.len(), 3);
        // Right-angle corner at the origin moves diagonally out
        assert_eq!(out[0], IntPoint::new(-10, -10));
        // Every output vertex lies outside the original ring's bounds
        assert!(out.iter().all(|p| p.x <= 110 + 15 && p.y <= 110 + 15));
    }

    #[test]
    fn test_rejects_degenerate_ring() {
        let two = vec![IntPoint::new(0, 0), IntPoint::new(10, 0)];
        assert!(matches!(
            offset_ring(&two, 5.0),
            Err(Error::EngineFailure(_))
        ));
    }
}

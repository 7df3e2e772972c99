//! Boolean clipping engine
//!
//! Wraps `i_overlay` for union and difference over rings of integer points.
//! Inputs and outputs stay in the integer coordinate domain chosen by the
//! accuracy factor; i64 coordinates are exact in the f64 overlay space.
//!
//! Output shapes are an outer contour plus its holes. Islands enclosed by a
//! hole surface as additional top-level shapes. Coincident input edges can
//! leave collinear break vertices on the output contours; those are
//! stripped so a union of axis-aligned boxes comes out with its minimal
//! vertex count.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nav2d_common::{Error, IntPoint, Result};

/// One output shape of a boolean operation
#[derive(Debug, Clone)]
pub struct ClipShape {
    /// Outer contour
    pub outer: Vec<IntPoint>,
    /// Holes punched into the outer contour
    pub holes: Vec<Vec<IntPoint>>,
}

/// Union of a set of rings under the non-zero fill rule
///
/// Fails with [`Error::EngineFailure`] when the engine produces no usable
/// shape for non-empty input.
pub fn union(rings: &[Vec<IntPoint>]) -> Result<Vec<ClipShape>> {
    if rings.is_empty() {
        return Ok(Vec::new());
    }

    let subject = vec![to_float_ring(&rings[0])];
    let clip: Vec<Vec<[f64; 2]>> = rings[1..].iter().map(|r| to_float_ring(r)).collect();

    let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
    let out = collect_shapes(shapes);
    if out.is_empty() {
        return Err(Error::EngineFailure(
            "union produced no output shape".to_string(),
        ));
    }
    Ok(out)
}

/// Difference of one subject ring minus a set of clip rings
///
/// An empty result is valid: the subject may be entirely covered.
pub fn difference(subject: &[IntPoint], clips: &[Vec<IntPoint>]) -> Result<Vec<ClipShape>> {
    if subject.len() < 3 {
        return Err(Error::EngineFailure(format!(
            "difference subject has {} vertices, expected at least 3",
            subject.len()
        )));
    }

    let subj = vec![to_float_ring(subject)];
    let clip: Vec<Vec<[f64; 2]>> = clips.iter().map(|r| to_float_ring(r)).collect();

    let shapes = subj.overlay(&clip, OverlayRule::Difference, FillRule::NonZero);
    Ok(collect_shapes(shapes))
}

fn to_float_ring(ring: &[IntPoint]) -> Vec<[f64; 2]> {
    ring.iter().map(|p| [p.x as f64, p.y as f64]).collect()
}

fn collect_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<ClipShape> {
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let mut contours = shape.into_iter();
        let Some(first) = contours.next() else {
            continue;
        };
        let outer = clean_contour(&first);
        if outer.len() < 3 {
            log::debug!("dropping degenerate outer contour from boolean output");
            continue;
        }
        let mut holes = Vec::new();
        for contour in contours {
            let hole = clean_contour(&contour);
            if hole.len() < 3 {
                log::debug!("dropping degenerate hole from boolean output");
                continue;
            }
            holes.push(hole);
        }
        out.push(ClipShape { outer, holes });
    }
    out
}

/// Rounds a float contour back onto the integer grid, then removes
/// consecutive duplicates and collinear break vertices
fn clean_contour(contour: &[[f64; 2]]) -> Vec<IntPoint> {
    let mut ring: Vec<IntPoint> = Vec::with_capacity(contour.len());
    for p in contour {
        let q = IntPoint::new(
            p[0].round_ties_even() as i64,
            p[1].round_ties_even() as i64,
        );
        if ring.last() != Some(&q) {
            ring.push(q);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return ring;
    }

    let n = ring.len();
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        let ax = (cur.x - prev.x) as i128;
        let ay = (cur.y - prev.y) as i128;
        let bx = (next.x - cur.x) as i128;
        let by = (next.y - cur.y) as i128;
        if ax * by - ay * bx != 0 {
            kept.push(cur);
        }
    }
    kept
}

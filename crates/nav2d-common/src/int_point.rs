//! Integer coordinates for the polygon engines
//!
//! The offset and clipper engines operate on 64-bit integer points. User
//! coordinates are multiplied by an [`Accuracy`] factor and rounded
//! half-to-even; the rounding error is the quantum of planning precision.

use glam::Vec2;

/// A point in the integer coordinate domain of the polygon engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i64,
    pub y: i64,
}

impl IntPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Quantizes a float point at the given scale factor
    pub fn from_vec2(v: Vec2, factor: f32) -> Self {
        Self {
            x: (v.x * factor).round_ties_even() as i64,
            y: (v.y * factor).round_ties_even() as i64,
        }
    }

    /// Maps back to float coordinates at the given scale factor
    pub fn to_vec2(self, factor: f32) -> Vec2 {
        Vec2::new(self.x as f32 / factor, self.y as f32 / factor)
    }
}

/// Scaling factor turning float coordinates into integer coordinates
///
/// `Hundred` keeps two decimal digits and is the common default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    One,
    Ten,
    #[default]
    Hundred,
    Thousand,
    TenThousand,
    HundredThousand,
}

impl Accuracy {
    /// The multiplication factor for this accuracy
    pub fn factor(self) -> f32 {
        match self {
            Accuracy::One => 1.0,
            Accuracy::Ten => 10.0,
            Accuracy::Hundred => 100.0,
            Accuracy::Thousand => 1_000.0,
            Accuracy::TenThousand => 10_000.0,
            Accuracy::HundredThousand => 100_000.0,
        }
    }

    /// The planning quantum (1 / factor)
    pub fn quantum(self) -> f32 {
        1.0 / self.factor()
    }
}

//! Axis-aligned bounds used by the spatial index and element caches

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum bounds
    pub min: Vec2,
    /// Maximum bounds
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new Aabb from min and max points
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates an empty Aabb (invalid bounds)
    pub fn empty() -> Self {
        Self {
            min: Vec2::splat(f32::MAX),
            max: Vec2::splat(f32::MIN),
        }
    }

    /// Checks if this Aabb is valid
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Expands this Aabb to include a point
    pub fn expand_point(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Checks if this Aabb overlaps with another Aabb
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Gets the center of the Aabb
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// The rectangle view of these bounds
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.min.x,
            self.min.y,
            self.max.x - self.min.x,
            self.max.y - self.min.y,
        )
    }
}

/// Axis-aligned rectangle in origin/extent form, the quadtree-facing view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle spanning two corners
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Area of the rectangle
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when the rectangle has no extent on either axis
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Checks if this rectangle intersects another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }

    /// Checks if `other` lies entirely within this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Returns this rectangle scaled about its center
    pub fn scaled_about_center(&self, factor: f32) -> Rect {
        let center = self.center();
        let half = Vec2::new(self.width, self.height) * factor * 0.5;
        Rect::from_corners(center - half, center + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_expand_and_overlap() {
        let mut a = Aabb::empty();
        assert!(!a.is_valid());
        a.expand_point(Vec2::new(-1.0, -2.0));
        a.expand_point(Vec2::new(3.0, 4.0));
        assert!(a.is_valid());
        assert_eq!(a.center(), Vec2::new(1.0, 1.0));

        let b = Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(5.0, 5.0));
        let c = Aabb::new(Vec2::new(4.0, 5.0), Vec2::new(6.0, 7.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Touching edges count as overlap
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_rect_contains_and_scale() {
        let world = Rect::new(-5.0, -5.0, 10.0, 10.0);
        let inner = Rect::new(-1.0, -1.0, 2.0, 2.0);
        assert!(world.contains_rect(&inner));
        assert!(!inner.contains_rect(&world));

        let doubled = world.scaled_about_center(2.0);
        assert_eq!(doubled, Rect::new(-10.0, -10.0, 20.0, 20.0));
        assert_eq!(doubled.center(), world.center());
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 1.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 0.5, 0.5).is_degenerate());
    }
}

//! Axis-aligned rectangle primitive.
//!
//! Every footprint in the engine (free rectangles, placed pieces, defect
//! zones, the packable region) is an axis-aligned rectangle given by its min
//! corner and extent.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for geometric comparisons (length units).
///
/// Free rectangles thinner than this are dropped, and edges closer than this
/// are treated as collinear.
pub const EPSILON: f64 = 0.1;

/// Tolerance for exact fit and containment checks.
pub const FIT_TOLERANCE: f64 = 1e-9;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Min x coordinate.
    pub x: f64,
    /// Min y coordinate.
    pub y: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Max x coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Max y coordinate.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Ratio of the longer side to the shorter side (infinite for slivers).
    pub fn aspect_ratio(&self) -> f64 {
        let short = self.width.min(self.height);
        if short <= 0.0 {
            return f64::INFINITY;
        }
        self.width.max(self.height) / short
    }

    /// Returns true if either side is at most [`EPSILON`].
    pub fn is_degenerate(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    /// Returns true if a `width` x `height` box fits inside this rectangle.
    pub fn fits(&self, width: f64, height: f64) -> bool {
        width <= self.width + FIT_TOLERANCE && height <= self.height + FIT_TOLERANCE
    }

    /// Open-interval overlap test: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - FIT_TOLERANCE
            && other.y >= self.y - FIT_TOLERANCE
            && other.right() <= self.right() + FIT_TOLERANCE
            && other.bottom() <= self.bottom() + FIT_TOLERANCE
    }

    /// Intersection of two rectangles, if it has positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Returns a copy grown by `dx` along x and `dy` along y (min corner fixed).
    pub fn expanded(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x, self.y, self.width + dx, self.height + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_edges_and_area() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_relative_eq!(r.right(), 40.0);
        assert_relative_eq!(r.bottom(), 60.0);
        assert_relative_eq!(r.area(), 1200.0);
        assert_relative_eq!(r.aspect_ratio(), 40.0 / 30.0);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(9.0, 9.0, 5.0, 5.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.contains(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!outer.contains(&Rect::new(90.0, 90.0, 20.0, 5.0)));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersection(&Rect::new(10.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_degenerate_and_fit() {
        assert!(Rect::new(0.0, 0.0, 0.05, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, 5.0).fits(10.0, 5.0));
        assert!(!Rect::new(0.0, 0.0, 10.0, 5.0).fits(5.0, 10.0));
        assert_eq!(Rect::new(0.0, 0.0, 1.0, 0.0).aspect_ratio(), f64::INFINITY);
    }
}

//! Geometric types for annotation coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2-D coordinate in logical screen space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are neither NaN nor infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Translate the point by the given offset
    pub fn translate(&self, dx: f64, dy: f64) -> PointF {
        PointF {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f64, f64)> for PointF {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Normalized rectangle (left <= right, top <= bottom)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectF {
    /// Build a rectangle from two arbitrary opposite corners
    pub fn from_corners(a: PointF, b: PointF) -> Self {
        let (left, right) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
        let (top, bottom) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest rectangle containing every point, `None` for an empty set
    pub fn bounding<'a>(points: impl IntoIterator<Item = &'a PointF>) -> Option<RectF> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(RectF::from_corners(first, first), |rect, p| RectF {
            left: rect.left.min(p.x),
            top: rect.top.min(p.y),
            right: rect.right.max(p.x),
            bottom: rect.bottom.max(p.y),
        }))
    }

    /// Translate the rectangle by the given offset
    pub fn translate(&self, dx: f64, dy: f64) -> RectF {
        RectF {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Check if this rectangle contains a point (edges included)
    pub fn contains_point(&self, p: PointF) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let rect = RectF::from_corners(PointF::new(10.0, 2.0), PointF::new(-4.0, 8.0));
        assert_eq!(rect.left, -4.0);
        assert_eq!(rect.top, 2.0);
        assert_eq!(rect.right, 10.0);
        assert_eq!(rect.bottom, 8.0);
        assert_eq!(rect.width(), 14.0);
        assert_eq!(rect.height(), 6.0);
    }

    #[test]
    fn test_bounding_empty_is_none() {
        let points: Vec<PointF> = Vec::new();
        assert!(RectF::bounding(&points).is_none());
    }

    #[test]
    fn test_bounding_covers_all_points() {
        let points = [
            PointF::new(3.0, 3.0),
            PointF::new(-1.0, 5.0),
            PointF::new(7.5, -2.0),
        ];
        let rect = RectF::bounding(&points).unwrap();
        assert_eq!(
            rect,
            RectF {
                left: -1.0,
                top: -2.0,
                right: 7.5,
                bottom: 5.0
            }
        );
        assert!(points.iter().all(|p| rect.contains_point(*p)));
    }

    #[test]
    fn test_translate() {
        let rect = RectF::from_corners(PointF::new(0.0, 0.0), PointF::new(2.0, 2.0));
        let moved = rect.translate(1.5, -1.0);
        assert_eq!(moved.left, 1.5);
        assert_eq!(moved.top, -1.0);
        assert_eq!(moved.width(), rect.width());
        assert_eq!(PointF::new(1.0, 1.0).translate(2.0, 3.0), PointF::new(3.0, 4.0));
    }

    #[test]
    fn test_point_is_finite() {
        assert!(PointF::new(1.0, -2.0).is_finite());
        assert!(!PointF::new(f64::NAN, 0.0).is_finite());
        assert!(!PointF::new(0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_point_display() {
        assert_eq!(PointF::new(1.0, 2.5).to_string(), "(1, 2.5)");
    }
}

use serde::{Deserialize, Serialize};

/// A 2D point, either in surface pixels or in projected (isometric) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A position in world space. `z` is elevation and doubles as a stacking hint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl WorldPos {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn ground(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Project a world position onto the isometric plane.
///
/// `isoX = x - y`, `isoY = (x + y) * 0.5 - z`.
pub fn project(pos: WorldPos) -> Point {
    Point::new(pos.x - pos.y, (pos.x + pos.y) * 0.5 - pos.z)
}

/// Inverse of [`project`] for a known elevation `z`.
pub fn unproject(iso: Point, z: f64) -> WorldPos {
    // x - y = u, x + y = 2 (v + z)
    let sum = 2.0 * (iso.y + z);
    WorldPos::new((sum + iso.x) * 0.5, (sum - iso.x) * 0.5, z)
}

/// Convert a displacement on the isometric plane into a ground-plane world displacement.
pub fn unproject_delta(du: f64, dv: f64) -> (f64, f64) {
    (dv + du * 0.5, dv - du * 0.5)
}

/// Pixel dimensions of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when nothing can be drawn on a surface of this size.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin, origin.translate(width, height))
    }

    /// Smallest box holding every point; `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Self::new(*first, *first);
        Some(rest.iter().fold(seed, |bb, p| bb.union(&Self::new(*p, *p))))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Inclusive on all edges.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: self.min.translate(-margin, -margin),
            max: self.max.translate(margin, margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_formula() {
        let iso = project(WorldPos::new(100.0, 40.0, 10.0));
        assert!((iso.x - 60.0).abs() < 1e-10);
        assert!((iso.y - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_unproject_inverts_project() {
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (120.0, 80.0, 0.0), (-35.5, 12.25, 7.0)] {
            let pos = WorldPos::new(x, y, z);
            let back = unproject(project(pos), z);
            assert!((back.x - x).abs() < 1e-10);
            assert!((back.y - y).abs() < 1e-10);
        }
    }

    #[test]
    fn test_unproject_delta_matches_unproject() {
        let a = unproject(Point::new(10.0, 20.0), 0.0);
        let b = unproject(Point::new(16.0, 29.0), 0.0);
        let (dx, dy) = unproject_delta(6.0, 9.0);
        assert!((b.x - a.x - dx).abs() < 1e-10);
        assert!((b.y - a.y - dy).abs() < 1e-10);
    }

    #[test]
    fn test_bbox_from_rotated_corners() {
        let corners = [
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(0.5, 0.5),
        ];
        let bb = BBox::from_points(&corners).unwrap();
        assert_eq!(bb.min, Point::new(-2.0, -1.0));
        assert_eq!(bb.max, Point::new(3.0, 4.0));
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_bbox_expand_and_contains() {
        let bb = BBox::from_origin_size(Point::new(40.0, 100.0), 25.0, 40.0);
        assert!(bb.contains_point(&Point::new(65.0, 140.0)));
        assert!(!bb.contains_point(&Point::new(66.0, 140.0)));
        let grown = bb.expand(4.0);
        assert_eq!(grown.min, Point::new(36.0, 96.0));
        assert!(grown.contains_point(&Point::new(66.0, 140.0)));
    }

    #[test]
    fn test_degenerate_size() {
        assert!(Size::new(0.0, 600.0).is_degenerate());
        assert!(Size::new(800.0, f64::NAN).is_degenerate());
        assert!(!Size::new(800.0, 600.0).is_degenerate());
    }
}

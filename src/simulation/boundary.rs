//! Axis-aligned rectangular regions used by the quadtree.
//!
//! A `Boundary` is described by its center and half extents. Containment is
//! inclusive on every edge, so a point on the line shared by two quadrants
//! belongs to both of them.
//!
//! The y axis grows downward (screen convention): "north" quadrants have the
//! smaller y.

use crate::error::SimError;
use crate::simulation::states::NVec2;

/// Extra room added around fitted bounds so bodies on the hull are not on the edge
const FIT_PADDING: f64 = 0.05;

/// Quadrant of a subdivided node, in child storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast = 0, // +x, -y
    NorthWest = 1, // -x, -y
    SouthEast = 2, // +x, +y
    SouthWest = 3, // -x, +y
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];

    /// Sign of the child's center offset along x and y
    fn signs(self) -> (f64, f64) {
        match self {
            Quadrant::NorthEast => (1.0, -1.0),
            Quadrant::NorthWest => (-1.0, -1.0),
            Quadrant::SouthEast => (1.0, 1.0),
            Quadrant::SouthWest => (-1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    center: NVec2,
    half_width: f64,
    half_height: f64,
}

impl Boundary {
    pub fn new(center: NVec2, half_width: f64, half_height: f64) -> Result<Self, SimError> {
        let valid = |h: f64| h > 0.0 && h.is_finite();
        if !valid(half_width) || !valid(half_height) {
            return Err(SimError::InvalidBoundary { half_width, half_height });
        }
        Ok(Self { center, half_width, half_height })
    }

    /// Padded square enclosing every position in `points`.
    ///
    /// Falls back to a unit square around the origin when `points` is empty, and
    /// to a unit half extent when all points coincide.
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = NVec2>,
    {
        let mut min = NVec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = NVec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        if !min.x.is_finite() || !max.x.is_finite() {
            return Self { center: NVec2::zeros(), half_width: 1.0, half_height: 1.0 };
        }

        // Square, so every level splits into square cells
        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5;
        let half = (half.x.max(half.y) * (1.0 + FIT_PADDING)).max(1.0);
        Self { center, half_width: half, half_height: half }
    }

    pub fn center(&self) -> NVec2 {
        self.center
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Longest side, used as the node size in the opening criterion
    pub fn size(&self) -> f64 {
        2.0 * self.half_width.max(self.half_height)
    }

    /// Inclusive membership test over `[x - hw, x + hw] x [y - hh, y + hh]`
    pub fn contains(&self, p: &NVec2) -> bool {
        p.x >= self.center.x - self.half_width
            && p.x <= self.center.x + self.half_width
            && p.y >= self.center.y - self.half_height
            && p.y <= self.center.y + self.half_height
    }

    /// Inclusive overlap test between two rectangles
    pub fn intersects(&self, other: &Boundary) -> bool {
        (self.center.x - other.center.x).abs() <= self.half_width + other.half_width
            && (self.center.y - other.center.y).abs() <= self.half_height + other.half_height
    }

    /// One quarter of this region: half the width and half the height
    pub fn quadrant(&self, q: Quadrant) -> Boundary {
        let w = self.half_width / 2.0;
        let h = self.half_height / 2.0;
        let (sx, sy) = q.signs();
        Boundary {
            center: NVec2::new(self.center.x + sx * w, self.center.y + sy * h),
            half_width: w,
            half_height: h,
        }
    }
}

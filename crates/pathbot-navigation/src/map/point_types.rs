//! Grid cells, workspace points and rectangular obstacles.

use std::fmt;

pub use pathbot_kinematics::WorldPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a point in grid coordinates (cell indices).
///
/// Signed so that positions left of or above the workspace still map to a
/// cell; such cells are simply out of bounds.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridPoint {
    /// The x-coordinate (column index) in the grid.
    pub x: i32,
    /// The y-coordinate (row index) in the grid.
    pub y: i32,
}

impl GridPoint {
    /// Creates a new `GridPoint`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of 4-connected unit steps between two cells.
    pub fn manhattan_distance(&self, other: &GridPoint) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Straight-line distance between two cells, in cells.
    pub fn euclidean_distance(&self, other: &GridPoint) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// An axis-aligned rectangular obstacle in workspace coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Obstacle {
    /// Creates a new `Obstacle`.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Builds the rectangle spanned by two opposite corners, in any order
    /// (e.g. the press and release points of a drag).
    #[must_use]
    pub fn from_corners(a: WorldPoint, b: WorldPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// True if the two closed rectangles share any point. Rectangles that
    /// touch along an edge or at a corner intersect.
    pub fn intersects(&self, other: &Obstacle) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }

    /// True if `p` lies inside the rectangle (left/top edges inclusive).
    pub fn contains(&self, p: WorldPoint) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Obstacle {{ x: {:.1}, y: {:.1}, w: {:.1}, h: {:.1} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

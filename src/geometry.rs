//! Planar geometry helpers shared by the collision and boundary code.

/// A point in the simulation plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of the segment from `self` to `other`, measured from the +x axis.
    #[must_use]
    pub fn angle_to(&self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// The point with both coordinates rounded to the nearest whole unit.
    #[must_use]
    pub fn rounded(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }
}

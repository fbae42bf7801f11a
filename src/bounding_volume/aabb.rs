//! Axis Aligned Bounding Box.

use crate::math::{Point, Point2, Real, Vector};
use num_traits::Bounded;

/// An Axis-Aligned Bounding Box.
///
/// Every segment and part of a geometry carries one of these; segment
/// enumeration over a query window uses it as a cheap reject test before any
/// precise computation happens.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb {
    /// The point with the smallest coordinates of this AABB.
    pub mins: Point<Real>,
    /// The point with the greatest coordinates of this AABB.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// `mins` must be smaller than `maxs` on every coordinate.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `+∞` and `maxs`
    /// components set to `-∞`.
    ///
    /// This is often used as the initial value of some AABB merging
    /// algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Computes the AABB of a set of points.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Aabb::new_invalid();

        for pt in pts {
            result.take_point(*pt);
        }

        result
    }

    /// Enlarges this AABB so it contains `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Merges this AABB with another one.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.coords.inf(&other.mins.coords).into(),
            maxs: self.maxs.coords.sup(&other.maxs.coords).into(),
        }
    }

    /// Enlarges this AABB by `amount` on every side, on the X and Y axes only.
    #[inline]
    pub fn loosened_xy(&self, amount: Real) -> Aabb {
        let mut result = *self;
        result.mins.x -= amount;
        result.mins.y -= amount;
        result.maxs.x += amount;
        result.maxs.y += amount;
        result
    }

    /// Checks whether this AABB intersects `other` on all three axes.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.intersects_xy(other) && self.mins.z <= other.maxs.z && other.mins.z <= self.maxs.z
    }

    /// Checks whether this AABB intersects `other`, ignoring the Z axis.
    ///
    /// Cut lines are planar; every broad-phase test of the cut engine runs in
    /// the XY plane.
    #[inline]
    pub fn intersects_xy(&self, other: &Aabb) -> bool {
        self.mins.x <= other.maxs.x
            && other.mins.x <= self.maxs.x
            && self.mins.y <= other.maxs.y
            && other.mins.y <= self.maxs.y
    }

    /// Checks whether this AABB contains the given XY point.
    #[inline]
    pub fn contains_point_xy(&self, pt: &Point2<Real>) -> bool {
        pt.x >= self.mins.x && pt.x <= self.maxs.x && pt.y >= self.mins.y && pt.y <= self.maxs.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_and_intersect() {
        let a = Aabb::from_points(&[
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 1.0, 3.0),
        ]);
        let b = Aabb::from_points(&[
            Point::new(1.0, 0.5, 0.0),
            Point::new(4.0, 2.0, 1.0),
        ]);

        assert!(a.intersects(&b));

        let merged = a.merged(&b);
        assert_eq!(merged.mins, Point::new(0.0, 0.0, 0.0));
        assert_eq!(merged.maxs, Point::new(4.0, 2.0, 3.0));
    }

    #[test]
    fn xy_test_ignores_z() {
        let a = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 0.0));
        let b = Aabb::new(Point::new(0.5, 0.5, 10.0), Point::new(2.0, 2.0, 20.0));

        assert!(!a.intersects(&b));
        assert!(a.intersects_xy(&b));
    }
}

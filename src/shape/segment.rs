//! Definition of the segment primitive.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Point2, Real, Vector, Vector2};
use crate::utils;
use na::Unit;

/// A directed segment between two (possibly Z-aware) points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Segment {
    /// The segment first point.
    pub a: Point<Real>,
    /// The segment second point.
    pub b: Point<Real>,
}

/// Logical description of the location of a point on a segment.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum SegmentPointLocation {
    /// The point lies on a vertex (`0` = start, `1` = end).
    OnVertex(u32),
    /// The point lies on the segment interior, at the given fraction.
    OnEdge(Real),
}

impl SegmentPointLocation {
    /// The fraction along the segment corresponding to this location.
    pub fn fraction(&self) -> Real {
        match self {
            SegmentPointLocation::OnVertex(0) => 0.0,
            SegmentPointLocation::OnVertex(_) => 1.0,
            SegmentPointLocation::OnEdge(f) => *f,
        }
    }
}

/// The XY projection of a point onto a segment's support line.
#[derive(Copy, Clone, Debug)]
pub struct SegmentProjection {
    /// Fraction of the projection along the segment, unclamped: values
    /// outside `[0, 1]` denote a projection beyond an endpoint.
    pub along: Real,
    /// Signed perpendicular distance; positive on the left of the segment
    /// direction.
    pub offset: Real,
    /// The closest point on the segment itself (clamped).
    pub closest: Point2<Real>,
    /// Where the clamped closest point lies.
    pub location: SegmentPointLocation,
}

impl Segment {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>) -> Segment {
        Segment { a, b }
    }

    /// The direction of this segment scaled by its length.
    ///
    /// Points from `self.a` toward `self.b`.
    pub fn scaled_direction(&self) -> Vector<Real> {
        self.b - self.a
    }

    /// The 3D length of this segment.
    pub fn length(&self) -> Real {
        self.scaled_direction().norm()
    }

    /// The length of this segment projected to the XY plane.
    pub fn length_xy(&self) -> Real {
        (self.b.xy() - self.a.xy()).norm()
    }

    /// The unit direction of this segment.
    ///
    /// Points from `self.a` toward `self.b`.
    /// Returns `None` if both points are equal.
    pub fn direction(&self) -> Option<Unit<Vector<Real>>> {
        Unit::try_new(self.scaled_direction(), crate::math::DEFAULT_EPSILON)
    }

    /// The XY unit direction of this segment, or `None` if the segment is
    /// vertical or degenerate in projection.
    pub fn direction_xy(&self) -> Option<Unit<Vector2<Real>>> {
        Unit::try_new(self.b.xy() - self.a.xy(), crate::math::DEFAULT_EPSILON)
    }

    /// Computes the point at the given fraction along this segment,
    /// interpolating X, Y and Z.
    pub fn point_at(&self, fraction: Real) -> Point<Real> {
        utils::lerp(&self.a, &self.b, fraction)
    }

    /// Computes the AABB of this segment.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points([&self.a, &self.b])
    }

    /// Projects `pt` onto this segment in the XY plane.
    pub fn project_xy(&self, pt: &Point2<Real>) -> SegmentProjection {
        let ab = self.b.xy() - self.a.xy();
        let ap = pt - self.a.xy();
        let ab_ap = ab.dot(&ap);
        let sqnab = ab.norm_squared();

        let (along, offset) = if sqnab == 0.0 {
            (0.0, ap.norm())
        } else {
            (ab_ap / sqnab, ab.perp(&ap) / sqnab.sqrt())
        };

        let (closest, location) = if along <= 0.0 {
            // Voronoï region of vertex 'a'.
            (self.a.xy(), SegmentPointLocation::OnVertex(0))
        } else if along >= 1.0 {
            // Voronoï region of vertex 'b'.
            (self.b.xy(), SegmentPointLocation::OnVertex(1))
        } else {
            // Voronoï region of the segment interior.
            (
                self.a.xy() + ab * along,
                SegmentPointLocation::OnEdge(along),
            )
        };

        SegmentProjection {
            along,
            offset,
            closest,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_regions() {
        let seg = Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(4.0, 0.0, 2.0));

        let mid = seg.project_xy(&Point2::new(2.0, 1.0));
        assert_relative_eq!(mid.along, 0.5);
        assert_relative_eq!(mid.offset, 1.0);
        assert!(matches!(mid.location, SegmentPointLocation::OnEdge(_)));

        let before = seg.project_xy(&Point2::new(-1.0, -1.0));
        assert!(before.along < 0.0);
        assert!(matches!(before.location, SegmentPointLocation::OnVertex(0)));
        assert_eq!(before.closest, Point2::new(0.0, 0.0));
    }

    #[test]
    fn point_at_interpolates_z() {
        let seg = Segment::new(Point::new(0.0, 0.0, 10.0), Point::new(4.0, 0.0, 20.0));
        assert_relative_eq!(seg.point_at(0.25).z, 12.5);
    }
}

//! Various unsorted geometrical and logical operators.

pub use self::convex_hull::convex_hull_2d;
pub use self::cov::{center, center_cov};
pub use self::point_in_poly::{
    distance_to_ring_xy, interior_point_xy, point_in_ring_xy, point_in_rings_xy,
};
pub use self::segments_intersection::{segments_intersection_xy, SegmentCrossing};

mod convex_hull;
mod cov;
mod point_in_poly;
mod segments_intersection;

use crate::math::{Point, Real};

/// Linearly interpolates between two points (X, Y and Z).
#[inline]
pub fn lerp(a: &Point<Real>, b: &Point<Real>, t: Real) -> Point<Real> {
    a + (b - a) * t
}

/// The signed area of a closed ring, projected to the XY plane.
///
/// Positive for counter-clockwise rings. The ring is implicitly closed:
/// the last point connects back to the first.
pub fn signed_area_xy(ring: &[Point<Real>]) -> Real {
    let mut acc = 0.0;

    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        acc += a.x * b.y - b.x * a.y;
    }

    acc * 0.5
}

/// The XY perimeter of a closed ring.
pub fn perimeter_xy(ring: &[Point<Real>]) -> Real {
    let mut acc = 0.0;

    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        acc += (b.xy() - a.xy()).norm();
    }

    acc
}

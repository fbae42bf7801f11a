use crate::bounding_volume::Aabb;
use crate::math::{Point, Point2, Real, Vector2};
use crate::shape::{Path, Polyline, Segment, SegmentProjection};
use crate::utils;
use arrayvec::ArrayVec;
use na::Unit;
use std::sync::Arc;

/// A uniform handle onto one segment of one part of a geometry.
///
/// Callers never branch on the concrete representation: a proxy backed by a
/// materialized curve and a proxy backed by a raw point array answer the same
/// queries. All fractional positions are in `[0, 1]` along the segment.
pub trait SegmentProxy {
    /// The part this segment belongs to.
    fn part_index(&self) -> usize;

    /// The index of this segment within its part.
    fn segment_index(&self) -> usize;

    /// The backing curve of this segment.
    ///
    /// Point-array-backed proxies materialize it on the fly; nothing is
    /// cached between calls.
    fn as_segment(&self) -> Segment;

    /// The start point of this segment.
    fn start_point(&self) -> Point<Real> {
        self.as_segment().a
    }

    /// The end point of this segment.
    fn end_point(&self) -> Point<Real> {
        self.as_segment().b
    }

    /// The XY length of this segment.
    fn length_xy(&self) -> Real {
        self.as_segment().length_xy()
    }

    /// The AABB of this segment.
    fn aabb(&self) -> Aabb {
        self.as_segment().aabb()
    }

    /// The point at the given fraction, interpolating X, Y and Z.
    fn point_at(&self, fraction: Real) -> Point<Real> {
        self.as_segment().point_at(fraction)
    }

    /// The XY tangent direction at the given fraction.
    ///
    /// Constant for linear segments; `None` if the segment degenerates in
    /// projection.
    fn direction_at(&self, _fraction: Real) -> Option<Unit<Vector2<Real>>> {
        self.as_segment().direction_xy()
    }

    /// Projects an arbitrary XY point onto this segment: along-fraction,
    /// signed perpendicular offset, and the clamped closest point.
    fn project_xy(&self, pt: &Point2<Real>) -> SegmentProjection {
        self.as_segment().project_xy(pt)
    }

    /// Extracts the sub-curve between two fractions as a standalone proxy.
    fn sub_curve(&self, from: Real, to: Real) -> CurveSegmentProxy {
        let curve = self.as_segment();
        CurveSegmentProxy::new(
            self.part_index(),
            self.segment_index(),
            Segment::new(curve.point_at(from), curve.point_at(to)),
        )
    }

    /// The segment approximated by a vertex run whose chords deviate from
    /// the true curve by at most `max_deviation`.
    ///
    /// Linear segments are exact: the two endpoints.
    fn densified_points(&self, _max_deviation: Real) -> Vec<Point<Real>> {
        let curve = self.as_segment();
        vec![curve.a, curve.b]
    }

    /// Materializes this segment as a standalone single-part polyline, for
    /// handoff to geometry-engine primitives that operate on curves.
    ///
    /// Without `force_creation`, a proxy may answer with the cheapest
    /// faithful rendition of itself (for linear segments, the two
    /// endpoints); forcing creation guarantees a standalone, fully
    /// materialized curve even for representations that would otherwise
    /// defer to their backing point array.
    fn to_polyline(&self, force_creation: bool) -> Polyline {
        let points = if force_creation {
            self.densified_points(0.0)
        } else {
            let curve = self.as_segment();
            vec![curve.a, curve.b]
        };

        Polyline::single(Path::new_open(points))
    }

    /// An inflated convex hull around this segment, at the given XY
    /// distance.
    ///
    /// The segment is densified before inflating, so the hull is guaranteed
    /// to contain the curve even for small buffer distances on non-linear
    /// segments.
    fn buffered_hull_xy(&self, distance: Real, max_deviation: Real) -> Vec<Point2<Real>> {
        let mut inflated = Vec::new();

        for pt in self.densified_points(max_deviation) {
            let stencil: ArrayVec<Point2<Real>, 4> = ArrayVec::from([
                Point2::new(pt.x - distance, pt.y - distance),
                Point2::new(pt.x + distance, pt.y - distance),
                Point2::new(pt.x + distance, pt.y + distance),
                Point2::new(pt.x - distance, pt.y + distance),
            ]);
            inflated.extend(stencil);
        }

        utils::convex_hull_2d(&inflated)
    }
}

/// A segment proxy wrapping a materialized curve directly.
///
/// Used for polyline and polygon parts, and for sub-curves extracted from
/// any proxy.
#[derive(Clone, Debug)]
pub struct CurveSegmentProxy {
    part: usize,
    seg: usize,
    curve: Segment,
}

impl CurveSegmentProxy {
    /// Creates a proxy from the materialized curve of segment `seg` of part
    /// `part`.
    pub fn new(part: usize, seg: usize, curve: Segment) -> Self {
        CurveSegmentProxy { part, seg, curve }
    }
}

impl SegmentProxy for CurveSegmentProxy {
    fn part_index(&self) -> usize {
        self.part
    }

    fn segment_index(&self) -> usize {
        self.seg
    }

    fn as_segment(&self) -> Segment {
        self.curve
    }
}

/// A lightweight segment proxy backed only by a shared raw point array.
///
/// Used for multipatch planes, where materializing a curve per segment would
/// dwarf the cost of the queries themselves. The proxy holds a shared handle
/// to the ring's vertices, so it can never outlive them.
#[derive(Clone, Debug)]
pub struct PointArraySegmentProxy {
    part: usize,
    seg: usize,
    points: Arc<[Point<Real>]>,
}

impl PointArraySegmentProxy {
    /// Creates a proxy onto segment `seg` of the closed ring `points`.
    ///
    /// # Panics
    ///
    /// Panics if `seg` is out of range.
    pub fn new(part: usize, seg: usize, points: Arc<[Point<Real>]>) -> Self {
        assert!(seg < points.len(), "segment index out of range");
        PointArraySegmentProxy { part, seg, points }
    }
}

impl SegmentProxy for PointArraySegmentProxy {
    fn part_index(&self) -> usize {
        self.part
    }

    fn segment_index(&self) -> usize {
        self.seg
    }

    fn as_segment(&self) -> Segment {
        let a = self.points[self.seg];
        let b = self.points[(self.seg + 1) % self.points.len()];
        Segment::new(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_proxy() -> PointArraySegmentProxy {
        let ring: Arc<[Point<Real>]> = vec![
            Point::new(0.0, 0.0, 5.0),
            Point::new(4.0, 0.0, 5.0),
            Point::new(4.0, 4.0, 9.0),
            Point::new(0.0, 4.0, 9.0),
        ]
        .into();

        PointArraySegmentProxy::new(2, 3, ring)
    }

    #[test]
    fn array_proxy_wraps_ring_closure() {
        let proxy = array_proxy();

        // Segment 3 closes the ring back onto vertex 0.
        assert_eq!(proxy.start_point(), Point::new(0.0, 4.0, 9.0));
        assert_eq!(proxy.end_point(), Point::new(0.0, 0.0, 5.0));
        assert_relative_eq!(proxy.length_xy(), 4.0);
    }

    #[test]
    fn both_representations_answer_alike() {
        let array = array_proxy();
        let curve = CurveSegmentProxy::new(2, 3, array.as_segment());

        let probe = Point2::new(-1.0, 2.0);
        let pa = array.project_xy(&probe);
        let pc = curve.project_xy(&probe);

        assert_relative_eq!(pa.along, pc.along);
        assert_relative_eq!(pa.offset, pc.offset);
        assert_eq!(array.point_at(0.5), curve.point_at(0.5));
    }

    #[test]
    fn buffered_hull_contains_endpoints() {
        let proxy = array_proxy();
        let hull = proxy.buffered_hull_xy(0.5, 0.01);

        assert!(hull.len() >= 4);
        assert!(utils::point_in_ring_xy(
            &Point2::new(0.0, 4.0),
            &hull
                .iter()
                .map(|p| Point::new(p.x, p.y, 0.0))
                .collect::<Vec<_>>()
        ));
    }
}

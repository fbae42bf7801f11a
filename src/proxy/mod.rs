//! Uniform, indexable views over the segments of multi-part geometries.

pub use self::indexed_multipatch::{IndexedMultipatch, IndexedSegment};
pub use self::patch::{PatchProxy, RingProxy};
pub use self::segment_proxy::{CurveSegmentProxy, PointArraySegmentProxy, SegmentProxy};

mod indexed_multipatch;
mod patch;
mod segment_proxy;

use crate::math::{Point, Real};
use crate::shape::{Polygon, Polyline};

/// Random access to the segments of a multi-part geometry, by
/// `(part, segment)` index.
///
/// This is the minimal contract the cut accumulator needs to reconstruct
/// output paths from retained sub-ranges; richer per-segment queries go
/// through [`SegmentProxy`].
pub trait SegmentSource {
    /// The number of parts.
    fn part_count(&self) -> usize;

    /// Whether the given part is a closed ring.
    fn is_closed(&self, part: usize) -> bool;

    /// The number of segments of the given part.
    fn segment_count(&self, part: usize) -> usize;

    /// The endpoints of one segment.
    fn segment_points(&self, part: usize, seg: usize) -> (Point<Real>, Point<Real>);
}

impl SegmentSource for Polyline {
    fn part_count(&self) -> usize {
        self.paths().len()
    }

    fn is_closed(&self, part: usize) -> bool {
        self.paths()[part].is_closed()
    }

    fn segment_count(&self, part: usize) -> usize {
        self.paths()[part].segment_count()
    }

    fn segment_points(&self, part: usize, seg: usize) -> (Point<Real>, Point<Real>) {
        let segment = self.paths()[part].segment(seg);
        (segment.a, segment.b)
    }
}

impl SegmentSource for Polygon {
    fn part_count(&self) -> usize {
        self.rings().len()
    }

    fn is_closed(&self, _part: usize) -> bool {
        true
    }

    fn segment_count(&self, part: usize) -> usize {
        self.rings()[part].segment_count()
    }

    fn segment_points(&self, part: usize, seg: usize) -> (Point<Real>, Point<Real>) {
        let segment = self.rings()[part].segment(seg);
        (segment.a, segment.b)
    }
}

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::proxy::{PointArraySegmentProxy, SegmentProxy};
use crate::shape::{Patch, PatchKind, Path, RingRole};
use crate::utils;
use std::sync::Arc;

/// One plane of a multipatch patch: a closed ring exposed through the
/// segment proxy contract.
///
/// The proxy shares the ring's vertex storage; creating it copies nothing.
#[derive(Clone, Debug)]
pub struct RingProxy {
    patch_index: usize,
    part_index: usize,
    role: RingRole,
    points: Arc<[Point<Real>]>,
}

impl RingProxy {
    pub(crate) fn new(
        patch_index: usize,
        part_index: usize,
        role: RingRole,
        points: Arc<[Point<Real>]>,
    ) -> Self {
        RingProxy {
            patch_index,
            part_index,
            role,
            points,
        }
    }

    /// The patch this plane belongs to.
    #[inline]
    pub fn patch_index(&self) -> usize {
        self.patch_index
    }

    /// The flat part index of this plane in the indexed multipatch.
    #[inline]
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    /// The role marker of this plane's ring.
    #[inline]
    pub fn role(&self) -> RingRole {
        self.role
    }

    /// The vertices of this plane.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// Multipatch rings are always closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        true
    }

    /// The number of segments of this plane.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len()
    }

    /// A proxy onto segment `i` of this plane.
    pub fn segment(&self, i: usize) -> PointArraySegmentProxy {
        PointArraySegmentProxy::new(self.part_index, i, self.points.clone())
    }

    /// The AABB of this plane.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.points.iter())
    }

    /// The signed XY area of this plane.
    pub fn signed_area_xy(&self) -> Real {
        utils::signed_area_xy(&self.points)
    }

    /// Extracts the boundary run from `(start_seg, start_fraction)` forward
    /// to `(end_seg, end_fraction)` as an open path.
    ///
    /// The walk wraps around the ring closure when `end` lies before
    /// `start`. A boundary falling strictly inside a segment interpolates
    /// the cut vertex (X, Y and Z) from that segment's endpoints.
    pub fn subpart(
        &self,
        start_seg: usize,
        start_fraction: Real,
        end_seg: usize,
        end_fraction: Real,
    ) -> Path {
        let n = self.segment_count();
        let mut points = Vec::new();

        points.push(self.segment(start_seg).point_at(start_fraction));

        let mut seg = start_seg;
        loop {
            let at_end = seg == end_seg
                && (seg != start_seg
                    || end_fraction >= start_fraction
                    || points.len() > 1);

            if at_end {
                let last = self.segment(end_seg).point_at(end_fraction);
                if points.last() != Some(&last) {
                    points.push(last);
                }
                break;
            }

            let vertex = self.segment(seg).end_point();
            if points.last() != Some(&vertex) {
                points.push(vertex);
            }
            seg = (seg + 1) % n;
        }

        Path::new_open(points)
    }
}

/// A patch of a multipatch, exposed as a group of [`RingProxy`] planes.
///
/// The number of planes determines how many flat part indices the patch
/// consumes in the indexed multipatch numbering.
#[derive(Clone, Debug)]
pub struct PatchProxy {
    patch_index: usize,
    kind: PatchKind,
    point_id: Option<i32>,
    planes: Vec<RingProxy>,
}

impl PatchProxy {
    pub(crate) fn new(patch_index: usize, first_part: usize, patch: &Patch) -> Self {
        let planes = patch
            .rings()
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                RingProxy::new(patch_index, first_part + i, ring.role(), ring.shared_points())
            })
            .collect();

        PatchProxy {
            patch_index,
            kind: patch.kind(),
            point_id: patch.point_id(),
            planes,
        }
    }

    /// The index of this patch in the source multipatch.
    #[inline]
    pub fn patch_index(&self) -> usize {
        self.patch_index
    }

    /// How this patch's vertices are assembled.
    #[inline]
    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// The vertex id tag of this patch, if any.
    #[inline]
    pub fn point_id(&self) -> Option<i32> {
        self.point_id
    }

    /// The planes of this patch.
    #[inline]
    pub fn planes(&self) -> &[RingProxy] {
        &self.planes
    }

    /// The number of planes, i.e. the number of flat part indices this patch
    /// consumes.
    #[inline]
    pub fn planes_count(&self) -> usize {
        self.planes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_ring() -> RingProxy {
        let points: Arc<[Point<Real>]> = vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(4.0, 0.0, 1.0),
            Point::new(4.0, 4.0, 3.0),
            Point::new(0.0, 4.0, 3.0),
        ]
        .into();

        RingProxy::new(0, 0, RingRole::Footprint, points)
    }

    #[test]
    fn subpart_interpolates_interior_boundaries() {
        let ring = unit_ring();
        let sub = ring.subpart(0, 0.5, 2, 0.25);

        let pts = sub.points();
        assert_eq!(pts[0], Point::new(2.0, 0.0, 1.0));
        assert_eq!(pts[1], Point::new(4.0, 0.0, 1.0));
        assert_eq!(pts[2], Point::new(4.0, 4.0, 3.0));
        assert_eq!(pts[3], Point::new(3.0, 4.0, 3.0));
        assert_eq!(pts.len(), 4);
    }

    #[test]
    fn subpart_wraps_around_ring_closure() {
        let ring = unit_ring();
        let sub = ring.subpart(3, 0.5, 0, 0.5);

        let pts = sub.points();
        assert_eq!(pts[0], Point::new(0.0, 2.0, 2.0));
        assert_eq!(pts[1], Point::new(0.0, 0.0, 1.0));
        assert_eq!(pts[2], Point::new(2.0, 0.0, 1.0));
    }
}

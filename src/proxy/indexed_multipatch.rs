use crate::bounding_volume::Aabb;
use crate::cut::CutError;
use crate::math::{Point, Real};
use crate::proxy::{PatchProxy, RingProxy, SegmentProxy, SegmentSource};
use crate::shape::{Multipatch, PatchKind, Path, Polygon, RingRole, Segment};
use either::Either;
use std::ops::Range;

/// One enumerated segment of an indexed multipatch.
///
/// Owned per iteration: retaining it beyond the current loop step is always
/// safe.
#[derive(Copy, Clone, Debug)]
pub struct IndexedSegment {
    /// The flat part index of the plane this segment belongs to.
    pub part: usize,
    /// The segment index within the part.
    pub segment: usize,
    /// The segment curve.
    pub curve: Segment,
}

/// A multipatch presented as a flat, randomly-addressable collection of
/// parts, one part per plane.
///
/// Keeps the patch ↔ part mapping, so callers can still tell which walls and
/// footprints belong together.
#[derive(Clone, Debug)]
pub struct IndexedMultipatch {
    patches: Vec<PatchProxy>,
    part_to_patch: Vec<usize>,
    patch_first_part: Vec<usize>,
}

impl IndexedMultipatch {
    /// Indexes a multipatch.
    ///
    /// Fails with [`CutError::UnsupportedGeometry`] when a patch is not
    /// ring-based: triangle strips and fans have no segment topology this
    /// layer can reason about.
    pub fn new(multipatch: &Multipatch) -> Result<Self, CutError> {
        let mut patches = Vec::with_capacity(multipatch.patches().len());
        let mut part_to_patch = Vec::new();
        let mut patch_first_part = Vec::with_capacity(multipatch.patches().len());

        for (pi, patch) in multipatch.patches().iter().enumerate() {
            if patch.kind() != PatchKind::Rings {
                return Err(CutError::UnsupportedGeometry {
                    patch: pi,
                    reason: "multipatch patch is a triangle strip or fan, not a ring group",
                });
            }

            let proxy = PatchProxy::new(pi, part_to_patch.len(), patch);
            patch_first_part.push(part_to_patch.len());
            part_to_patch.extend(std::iter::repeat(pi).take(proxy.planes_count()));
            patches.push(proxy);
        }

        Ok(IndexedMultipatch {
            patches,
            part_to_patch,
            patch_first_part,
        })
    }

    /// The number of flat parts (planes).
    #[inline]
    pub fn part_count(&self) -> usize {
        self.part_to_patch.len()
    }

    /// The number of patches.
    #[inline]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// The patch proxies.
    #[inline]
    pub fn patches(&self) -> &[PatchProxy] {
        &self.patches
    }

    /// The plane at the given flat part index.
    pub fn part(&self, part: usize) -> &RingProxy {
        let pi = self.part_to_patch[part];
        let local = part - self.patch_first_part[pi];
        &self.patches[pi].planes()[local]
    }

    /// The patch index owning the given flat part.
    #[inline]
    pub fn patch_of_part(&self, part: usize) -> usize {
        self.part_to_patch[part]
    }

    /// The flat part range consumed by the given patch.
    pub fn parts_of_patch(&self, patch: usize) -> Range<usize> {
        let first = self.patch_first_part[patch];
        first..first + self.patches[patch].planes_count()
    }

    /// The number of segments of one part.
    pub fn part_segment_count(&self, part: usize) -> usize {
        self.part(part).segment_count()
    }

    /// Enumerates the segments of every part, optionally restricted to those
    /// whose AABB intersects `query` in XY.
    ///
    /// The per-segment box test is a cheap reject: callers still run their
    /// precise computation on the survivors.
    pub fn segments(&self, query: Option<&Aabb>) -> impl Iterator<Item = IndexedSegment> + '_ {
        let all = self.patches.iter().flat_map(|patch| {
            patch.planes().iter().flat_map(|plane| {
                (0..plane.segment_count()).map(move |si| IndexedSegment {
                    part: plane.part_index(),
                    segment: si,
                    curve: plane.segment(si).as_segment(),
                })
            })
        });

        match query {
            Some(query) => {
                let query = *query;
                Either::Left(all.filter(move |seg| seg.curve.aabb().intersects_xy(&query)))
            }
            None => Either::Right(all),
        }
    }

    /// Extracts a sub-part polyline of one plane between two fractional
    /// segment positions (see [`RingProxy::subpart`]).
    pub fn subpart(
        &self,
        part: usize,
        start_seg: usize,
        start_fraction: Real,
        end_seg: usize,
        end_fraction: Real,
    ) -> Path {
        self.part(part)
            .subpart(start_seg, start_fraction, end_seg, end_fraction)
    }

    /// The XY footprint polygon of the multipatch: footprint rings as
    /// counter-clockwise exteriors, hole rings as clockwise holes, wall
    /// rings skipped.
    pub fn footprint(&self) -> Polygon {
        let mut rings = Vec::new();

        for patch in &self.patches {
            for plane in patch.planes() {
                let flatten = |p: &Point<Real>| Point::new(p.x, p.y, 0.0);
                let mut ring = Path::new_ring(plane.points().iter().map(flatten).collect());

                match plane.role() {
                    RingRole::Footprint => {
                        if ring.signed_area_xy() < 0.0 {
                            ring.reverse();
                        }
                    }
                    RingRole::Hole => {
                        if ring.signed_area_xy() > 0.0 {
                            ring.reverse();
                        }
                    }
                    RingRole::Wall => continue,
                }

                rings.push(ring);
            }
        }

        Polygon::new(rings)
    }
}

impl SegmentSource for IndexedMultipatch {
    fn part_count(&self) -> usize {
        self.part_to_patch.len()
    }

    fn is_closed(&self, _part: usize) -> bool {
        true
    }

    fn segment_count(&self, part: usize) -> usize {
        self.part(part).segment_count()
    }

    fn segment_points(&self, part: usize, seg: usize) -> (Point<Real>, Point<Real>) {
        let curve = self.part(part).segment(seg).as_segment();
        (curve.a, curve.b)
    }
}

use crate::math::{Point, Real};
use crate::proxy::SegmentSource;
use crate::shape::SpatialReference;
use crate::utils;
use ordered_float::OrderedFloat;

/// A retained fractional sub-range of one segment, recorded while a cut
/// partitions a geometry's boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentPart {
    /// The part the segment belongs to.
    pub part: usize,
    /// The segment index within the part.
    pub segment: usize,
    /// Start of the retained range, as a fraction of the segment.
    pub min_fraction: Real,
    /// End of the retained range, as a fraction of the segment.
    pub max_fraction: Real,
    /// Whether the whole segment is retained.
    pub full_segment: bool,
}

impl SegmentPart {
    /// The retained range start in part-position units (segment index plus
    /// fraction).
    #[inline]
    pub fn full_min(&self) -> Real {
        self.segment as Real + self.min_fraction
    }

    /// The retained range end in part-position units.
    #[inline]
    pub fn full_max(&self) -> Real {
        self.segment as Real + self.max_fraction
    }
}

/// One output path reconstructed from a run of retained sub-ranges.
#[derive(Clone, Debug)]
pub struct ReconstructedPath {
    /// The part the run was retained from.
    pub part: usize,
    /// The vertices of the path.
    pub points: Vec<Point<Real>>,
    /// Per-vertex flag: `true` for vertices interpolated at a fractional
    /// cut position, `false` for vertices taken from the source.
    pub new_mask: Vec<bool>,
}

/// Accumulates the segment sub-ranges retained on one side of a cut and
/// reconstructs them into output paths.
#[derive(Clone, Debug, Default)]
pub struct SegmentPartList {
    entries: Vec<SegmentPart>,
}

impl SegmentPartList {
    /// Creates an empty list.
    pub fn new() -> Self {
        SegmentPartList {
            entries: Vec::new(),
        }
    }

    /// The recorded entries, in insertion order.
    pub fn entries(&self) -> &[SegmentPart] {
        &self.entries
    }

    /// Retains a whole segment.
    pub fn add_full(&mut self, part: usize, segment: usize) {
        self.entries.push(SegmentPart {
            part,
            segment,
            min_fraction: 0.0,
            max_fraction: 1.0,
            full_segment: true,
        });
    }

    /// Retains the `[min_fraction, max_fraction]` sub-range of a segment.
    pub fn add(&mut self, part: usize, segment: usize, min_fraction: Real, max_fraction: Real) {
        debug_assert!(min_fraction <= max_fraction);
        self.entries.push(SegmentPart {
            part,
            segment,
            min_fraction,
            max_fraction,
            full_segment: min_fraction <= 0.0 && max_fraction >= 1.0,
        });
    }

    /// Drops all recorded entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reconstructs the retained ranges into output paths.
    ///
    /// Entries are stably sorted by `(part, position)`; a run of entries
    /// merges into one path while the next entry starts at or before the
    /// accumulated end of the run, and a gap starts a new path. A run
    /// boundary falling strictly inside a segment interpolates the output
    /// vertex (X, Y and Z) from that segment's endpoints in `source`; this
    /// is the only place sub-segment interpolation happens during
    /// reconstruction.
    pub fn get_parts(
        &self,
        source: &impl SegmentSource,
        srs: &SpatialReference,
    ) -> Vec<ReconstructedPath> {
        const POSITION_EPS: Real = 1.0e-9;

        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| (e.part, OrderedFloat(e.full_min())));

        let mut result = Vec::new();
        let mut iter = sorted.into_iter().peekable();

        while let Some(first) = iter.next() {
            let part = first.part;
            let mut run_end = first.full_max();

            // Coalesce adjacent/overlapping entries of the same part.
            while let Some(next) = iter.peek() {
                if next.part != part || next.full_min() > run_end + POSITION_EPS {
                    break;
                }
                run_end = run_end.max(next.full_max());
                let _ = iter.next();
            }

            if let Some(path) =
                self.build_path(source, srs, part, first.full_min(), run_end)
            {
                result.push(path);
            }
        }

        result
    }

    fn build_path(
        &self,
        source: &impl SegmentSource,
        srs: &SpatialReference,
        part: usize,
        start_pos: Real,
        end_pos: Real,
    ) -> Option<ReconstructedPath> {
        let vertex_at = |position: usize| -> Point<Real> {
            if position < source.segment_count(part) {
                source.segment_points(part, position).0
            } else {
                source.segment_points(part, position - 1).1
            }
        };

        let mut points: Vec<Point<Real>> = Vec::new();
        let mut new_mask: Vec<bool> = Vec::new();
        let mut push = |pt: Point<Real>, is_new: bool| {
            if points
                .last()
                .map_or(true, |last| (last.xy() - pt.xy()).norm() > srs.xy_tolerance * 1.0e-2)
            {
                points.push(pt);
                new_mask.push(is_new);
            }
        };

        let start_seg = (start_pos.floor() as usize).min(source.segment_count(part) - 1);
        let start_frac = start_pos - start_seg as Real;

        if start_frac > 0.0 && start_frac < 1.0 {
            let (a, b) = source.segment_points(part, start_seg);
            push(utils::lerp(&a, &b, start_frac), true);
        } else {
            push(vertex_at(start_pos.round() as usize), false);
        }

        let end_seg = end_pos.floor() as usize;
        let end_frac = end_pos - end_seg as Real;

        let first_vertex = start_pos.floor() as usize + 1;
        let last_vertex = if end_frac > 0.0 { end_seg } else { end_seg.saturating_sub(1) };
        for v in first_vertex..=last_vertex.min(source.segment_count(part)) {
            push(vertex_at(v), false);
        }

        if end_frac > 0.0 {
            let (a, b) = source.segment_points(part, end_seg);
            push(utils::lerp(&a, &b, end_frac), true);
        } else {
            push(vertex_at(end_seg), false);
        }

        if points.len() < 2 {
            return None;
        }

        Some(ReconstructedPath {
            part,
            points,
            new_mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Path, Polyline};

    fn source() -> Polyline {
        Polyline::single(Path::new_open(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(10.0, 0.0, 10.0),
            Point::new(20.0, 0.0, 20.0),
            Point::new(30.0, 0.0, 30.0),
        ]))
    }

    #[test]
    fn merges_contiguous_ranges_into_one_path() {
        let mut list = SegmentPartList::new();
        list.add(0, 0, 0.5, 1.0);
        list.add_full(0, 1);
        list.add(0, 2, 0.0, 0.25);

        let parts = list.get_parts(&source(), &SpatialReference::default());
        assert_eq!(parts.len(), 1);

        let path = &parts[0];
        assert_eq!(path.points.len(), 4);
        assert_eq!(path.points[0], Point::new(5.0, 0.0, 5.0));
        assert_eq!(path.points[1], Point::new(10.0, 0.0, 10.0));
        assert_eq!(path.points[2], Point::new(20.0, 0.0, 20.0));
        assert_eq!(path.points[3], Point::new(22.5, 0.0, 22.5));
        assert_eq!(path.new_mask, vec![true, false, false, true]);
    }

    #[test]
    fn gap_starts_a_new_path() {
        let mut list = SegmentPartList::new();
        // Recorded out of order: the stable sort puts them right.
        list.add(0, 2, 0.5, 1.0);
        list.add(0, 0, 0.0, 0.5);

        let parts = list.get_parts(&source(), &SpatialReference::default());
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].points[0], Point::new(0.0, 0.0, 0.0));
        assert_eq!(parts[0].points[1], Point::new(5.0, 0.0, 5.0));
        assert_eq!(parts[1].points[0], Point::new(25.0, 0.0, 25.0));
        assert_eq!(parts[1].points[1], Point::new(30.0, 0.0, 30.0));
    }

    #[test]
    fn overlapping_ranges_coalesce() {
        let mut list = SegmentPartList::new();
        list.add(0, 0, 0.2, 0.8);
        list.add(0, 0, 0.6, 1.0);
        list.add_full(0, 1);

        let parts = list.get_parts(&source(), &SpatialReference::default());
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].points.first().unwrap(), &Point::new(2.0, 0.0, 2.0));
        assert_eq!(
            parts[0].points.last().unwrap(),
            &Point::new(20.0, 0.0, 20.0)
        );
    }
}

//! Cutting of vertical wall rings.
//!
//! A wall ring collapses to a line in XY, so the planar cutter cannot split
//! it directly. Instead the wall is unrolled into the (distance-along-
//! baseline, z) plane, where the cut becomes a straight vertical chord, and
//! the pieces are mapped back onto the baseline afterwards.

use crate::cut::ring_cutter::{cut_ring_group, LinePath, PreparedLine, RingDraft};
use crate::math::{Point, Point2, Real, Vector2};
use crate::shape::SpatialReference;
use crate::utils::{self, SegmentCrossing};
use log::debug;

/// Whether a ring is vertical within tolerance: near-zero XY area and an XY
/// projection that collapses onto a line.
pub(crate) fn is_vertical_ring(points: &[Point<Real>], tol: Real) -> bool {
    let perimeter = utils::perimeter_xy(points);
    // Worst case for a standing sliver: half the diagonal tolerance offset
    // times half the ring length.
    let threshold = 1.5 * tol / 2.0 * perimeter / 2.0;

    if utils::signed_area_xy(points).abs() > threshold {
        return false;
    }

    match fit_baseline(points) {
        None => true,
        Some((origin, dir)) => points.iter().all(|p| {
            let d = p.xy() - origin;
            (d.x * dir.y - d.y * dir.x).abs() <= tol * 1.5
        }),
    }
}

/// The best-fit XY baseline of a vertical ring: an origin and a unit
/// direction. `None` when all points coincide in XY.
pub(crate) fn fit_baseline(points: &[Point<Real>]) -> Option<(Point2<Real>, Vector2<Real>)> {
    let n = points.len() as Real;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x / n;
        cy += p.y / n;
    }

    let (mut xx, mut xy, mut yy) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        xx += dx * dx;
        xy += dx * dy;
        yy += dy * dy;
    }

    if xx + yy < 1.0e-20 {
        return None;
    }

    // Principal axis of the 2x2 covariance.
    let angle = 0.5 * (2.0 * xy).atan2(xx - yy);
    Some((
        Point2::new(cx, cy),
        Vector2::new(angle.cos(), angle.sin()),
    ))
}

/// One piece of a cut wall ring.
pub(crate) struct WallPiece {
    pub ring: RingDraft,
    /// XY midpoint of the piece's baseline span, for footprint-part
    /// assignment.
    pub baseline_mid: Point2<Real>,
}

/// Cuts a vertical wall ring at every spot the cut line crosses its
/// baseline. Returns `None` when the wall is not crossed.
pub(crate) fn cut_wall_ring(
    points: &[Point<Real>],
    line: &PreparedLine,
    srs: &SpatialReference,
) -> Option<Vec<WallPiece>> {
    let tol = srs.xy_tolerance;
    let (origin, dir) = fit_baseline(points)?;

    let params: Vec<Real> = points.iter().map(|p| (p.xy() - origin).dot(&dir)).collect();
    let (d_min, d_max) = params
        .iter()
        .fold((Real::MAX, Real::MIN), |(lo, hi), &d| (lo.min(d), hi.max(d)));

    if d_max - d_min < tol {
        return None;
    }

    // Where does the cut line cross the baseline?
    let base_a = origin + dir * d_min;
    let base_b = origin + dir * d_max;
    let mut cuts: Vec<Real> = Vec::new();

    for path in &line.paths {
        for li in 0..path.segment_count() {
            let lseg = path.segment(li);
            let eps = 1.0e-10 * (d_max - d_min).max(1.0) * lseg.length_xy().max(1.0);

            if let Some(SegmentCrossing::Point { s, .. }) = utils::segments_intersection_xy(
                &base_a,
                &base_b,
                &lseg.a.xy(),
                &lseg.b.xy(),
                eps,
            ) {
                let d = d_min + s * (d_max - d_min);
                if d > d_min + tol && d < d_max - tol {
                    cuts.push(d);
                }
            }
        }
    }

    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    cuts.dedup_by(|a, b| *a - *b < tol);

    if cuts.is_empty() {
        return None;
    }

    // Unroll into the (d, z) plane; the cutter wants a counter-clockwise
    // exterior.
    let unrolled: Vec<Point<Real>> = points
        .iter()
        .zip(params.iter())
        .map(|(p, &d)| Point::new(d, p.z, 0.0))
        .collect();

    let mut ring = unrolled.clone();
    let inverted = utils::signed_area_xy(&ring) < 0.0;
    if inverted {
        ring.reverse();
    }

    let (z_min, z_max) = points
        .iter()
        .fold((Real::MAX, Real::MIN), |(lo, hi), p| (lo.min(p.z), hi.max(p.z)));
    let margin = (z_max - z_min).max(1.0) * 2.0;

    let chord_paths: Vec<LinePath> = cuts
        .iter()
        .map(|&d| {
            LinePath::from_two_points(
                Point::new(d, z_min - margin, 0.0),
                Point::new(d, z_max + margin, 0.0),
            )
        })
        .collect();

    let unroll_line = PreparedLine {
        paths: chord_paths,
    };

    let pieces = cut_ring_group(&[ring], &unroll_line, srs)?;
    if pieces.len() < 2 {
        return None;
    }

    let mut result = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if !piece.holes.is_empty() {
            debug!("cut wall piece unexpectedly carries holes; they are dropped");
        }

        let mut draft = piece.exterior;
        if inverted {
            draft.reverse();
        }

        let (lo, hi) = draft
            .points
            .iter()
            .fold((Real::MAX, Real::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));

        // Map back: x was the baseline parameter, y was z. Original
        // vertices return exactly; cut vertices interpolate on the
        // baseline.
        let mapped: Vec<Point<Real>> = draft
            .points
            .iter()
            .zip(draft.new_mask.iter())
            .map(|(up, &is_new)| {
                if !is_new {
                    if let Some(k) = unrolled
                        .iter()
                        .position(|u| (u.xy() - up.xy()).norm() < tol * 1.0e-2)
                    {
                        return points[k];
                    }
                }
                let xy = origin + dir * up.x;
                Point::new(xy.x, xy.y, up.y)
            })
            .collect();

        result.push(WallPiece {
            ring: RingDraft {
                points: mapped,
                new_mask: draft.new_mask,
            },
            baseline_mid: origin + dir * ((lo + hi) * 0.5),
        });
    }

    Some(result)
}

use crate::math::{Point, Point2, Real};

/// Tests if the given XY point is inside an arbitrary closed ring, using a
/// counting winding strategy.
///
/// The ring is given by its 3D vertices (Z is ignored) and is implicitly
/// closed: the last point connects back to the first. Handles concave rings
/// with arbitrary orientation.
pub fn point_in_ring_xy(pt: &Point2<Real>, ring: &[Point<Real>]) -> bool {
    if ring.is_empty() {
        return false;
    }

    let mut winding = 0i32;

    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let seg_dir = b.xy() - a.xy();
        let dpt = pt - a.xy();
        let perp = dpt.perp(&seg_dir);
        winding += match (dpt.y >= 0.0, b.y > pt.y) {
            (true, true) if perp < 0.0 => 1,
            (false, false) if perp > 0.0 => 1,
            _ => 0,
        };
    }

    winding % 2 == 1
}

/// Tests if the given XY point is inside the region bounded by an outer ring
/// and a set of inner rings (holes).
pub fn point_in_rings_xy(pt: &Point2<Real>, exterior: &[Point<Real>], holes: &[&[Point<Real>]]) -> bool {
    point_in_ring_xy(pt, exterior) && !holes.iter().any(|hole| point_in_ring_xy(pt, hole))
}

/// The XY distance from a point to the closest boundary point of a closed ring.
pub fn distance_to_ring_xy(pt: &Point2<Real>, ring: &[Point<Real>]) -> Real {
    let mut best = Real::MAX;

    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let ab = b.xy() - a.xy();
        let ap = pt - a.xy();
        let sqnab = ab.norm_squared();

        let proj = if sqnab == 0.0 {
            a.xy()
        } else {
            let u = (ap.dot(&ab) / sqnab).clamp(0.0, 1.0);
            a.xy() + ab * u
        };

        best = best.min((pt - proj).norm());
    }

    best
}

/// Computes a point in the interior of the region bounded by `exterior` minus
/// `holes`, at least `clearance` away from every boundary if such a spot
/// exists on the probing scanline.
///
/// Probes horizontal scanlines through the ring's Y-extent and returns the
/// midpoint of the widest uncovered span. Returns `None` for degenerate
/// (zero-height or sliver) rings.
pub fn interior_point_xy(
    exterior: &[Point<Real>],
    holes: &[&[Point<Real>]],
    clearance: Real,
) -> Option<Point2<Real>> {
    let (y_min, y_max) = exterior
        .iter()
        .fold((Real::MAX, Real::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    if !(y_max - y_min).is_finite() || y_max - y_min <= 0.0 {
        return None;
    }

    // The mid-scanline almost always works; the extra offsets cover rings
    // whose mid-height is blocked by a hole or a horizontal edge.
    for frac in [0.5, 0.37, 0.63, 0.21, 0.79] {
        let y = y_min + (y_max - y_min) * frac;
        let mut xs = scanline_hits(exterior, y);

        for hole in holes {
            xs.extend(scanline_hits(hole, y));
        }

        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // Even-odd: spans between hit 2k and 2k+1 are interior.
        let mut best: Option<(Real, Real)> = None;
        for pair in xs.chunks_exact(2) {
            let width = pair[1] - pair[0];
            if best.map_or(true, |(w, _)| width > w) {
                best = Some((width, (pair[0] + pair[1]) * 0.5));
            }
        }

        if let Some((width, x)) = best {
            if width > clearance * 2.0 {
                let candidate = Point2::new(x, y);
                if point_in_rings_xy(&candidate, exterior, holes) {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn scanline_hits(ring: &[Point<Real>], y: Real) -> Vec<Real> {
    let mut xs = Vec::new();

    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        // Half-open rule so a vertex exactly on the scanline counts once.
        if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
            let t = (y - a.y) / (b.y - a.y);
            xs.push(a.x + (b.x - a.x) * t);
        }
    }

    xs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;

    fn square(size: Real) -> Vec<Point<Real>> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(size, 0.0, 0.0),
            Point::new(size, size, 0.0),
            Point::new(0.0, size, 0.0),
        ]
    }

    #[test]
    fn point_in_ring_concave() {
        let ring = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(4.0, 0.0, 0.0),
            Point::new(4.0, 4.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
            Point::new(0.0, 4.0, 0.0),
        ];

        assert!(point_in_ring_xy(&Point2::new(1.0, 1.0), &ring));
        assert!(!point_in_ring_xy(&Point2::new(2.0, 3.0), &ring));
    }

    #[test]
    fn interior_point_avoids_hole() {
        let exterior = square(10.0);
        let hole: Vec<_> = square(4.0)
            .iter()
            .map(|p| Point::new(p.x + 3.0, p.y + 3.0, 0.0))
            .collect();

        let pt = interior_point_xy(&exterior, &[&hole], 0.01).unwrap();
        assert!(point_in_ring_xy(&pt, &exterior));
        assert!(!point_in_ring_xy(&pt, &hole));
    }

    #[test]
    fn distance_to_ring() {
        let ring = square(10.0);
        assert_relative_eq!(
            distance_to_ring_xy(&Point2::new(5.0, 2.0), &ring),
            2.0,
            epsilon = 1.0e-12
        );
    }
}

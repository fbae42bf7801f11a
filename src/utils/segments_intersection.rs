use crate::math::{Point2, Real};

/// Intersection between two 2D segments, expressed as fractions along each
/// segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentCrossing {
    /// Single point of intersection.
    Point {
        /// Fraction of the intersection along the first segment, in `[0, 1]`.
        s: Real,
        /// Fraction of the intersection along the second segment, in `[0, 1]`.
        t: Real,
    },
    /// Collinear overlap along a shared sub-range.
    Overlap {
        /// Fractional range of the overlap along the first segment.
        s: [Real; 2],
        /// Fractional range of the overlap along the second segment.
        t: [Real; 2],
    },
}

/// Computes the intersection between the segments `[a, b]` and `[c, d]`.
///
/// `epsilon` is the collinearity threshold: triangles with a (doubled) signed
/// area smaller than `epsilon` are treated as degenerate, which routes the
/// computation through the parallel/overlap branch.
pub fn segments_intersection_xy(
    a: &Point2<Real>,
    b: &Point2<Real>,
    c: &Point2<Real>,
    d: &Point2<Real>,
    epsilon: Real,
) -> Option<SegmentCrossing> {
    let ab = b - a;
    let cd = d - c;
    let denom = ab.perp(&cd);

    if denom.abs() < epsilon {
        return parallel_intersection(a, b, c, d, epsilon);
    }

    let ac = c - a;
    let s = ac.perp(&cd) / denom;
    let t = ac.perp(&ab) / denom;

    if s < 0.0 || s > 1.0 || t < 0.0 || t > 1.0 {
        None
    } else {
        Some(SegmentCrossing::Point { s, t })
    }
}

fn parallel_intersection(
    a: &Point2<Real>,
    b: &Point2<Real>,
    c: &Point2<Real>,
    d: &Point2<Real>,
    epsilon: Real,
) -> Option<SegmentCrossing> {
    let ab = b - a;
    let sqnab = ab.norm_squared();

    if sqnab == 0.0 {
        return None;
    }

    // Not collinear: parallel segments on distinct support lines never meet.
    if (c - a).perp(&ab).abs() >= epsilon || (d - a).perp(&ab).abs() >= epsilon {
        return None;
    }

    let u0 = (c - a).dot(&ab) / sqnab;
    let u1 = (d - a).dot(&ab) / sqnab;
    let (lo_s, lo_t, hi_s, hi_t) = if u0 <= u1 {
        (u0, 0.0, u1, 1.0)
    } else {
        (u1, 1.0, u0, 0.0)
    };

    let start = lo_s.max(0.0);
    let end = hi_s.min(1.0);

    if start > end {
        return None;
    }

    // Map the clamped overlap range back onto `[c, d]`.
    let span = hi_s - lo_s;
    let t_at = |s: Real| {
        if span == 0.0 {
            lo_t
        } else {
            lo_t + (hi_t - lo_t) * (s - lo_s) / span
        }
    };

    if end - start <= crate::math::DEFAULT_EPSILON {
        Some(SegmentCrossing::Point {
            s: start,
            t: t_at(start),
        })
    } else {
        Some(SegmentCrossing::Overlap {
            s: [start, end],
            t: [t_at(start), t_at(end)],
        })
    }
}

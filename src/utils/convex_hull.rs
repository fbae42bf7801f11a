use crate::math::{Point2, Real};

/// Computes the convex hull of a 2D point set with the monotone chain
/// algorithm.
///
/// The hull is returned in counter-clockwise order without the closing
/// duplicate point. Inputs with fewer than three distinct points return the
/// distinct points as-is.
pub fn convex_hull_2d(points: &[Point2<Real>]) -> Vec<Point2<Real>> {
    let mut pts: Vec<Point2<Real>> = points.to_vec();
    pts.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).unwrap());
    pts.dedup_by(|a, b| a == b);

    if pts.len() < 3 {
        return pts;
    }

    let cross = |o: &Point2<Real>, a: &Point2<Real>, b: &Point2<Real>| (a - o).perp(&(b - o));

    let mut hull: Vec<Point2<Real>> = Vec::with_capacity(pts.len() * 2);

    for p in pts.iter().chain(pts.iter().rev()) {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0 {
            let _ = hull.pop();
        }
        hull.push(*p);
    }

    // Both sweeps re-push their starting point.
    let _ = hull.pop();
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_of_square_with_interior_points() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.5, 1.5),
        ];

        let hull = convex_hull_2d(&pts);
        assert_eq!(hull.len(), 4);
        assert!(hull.contains(&Point2::new(0.0, 0.0)));
        assert!(hull.contains(&Point2::new(2.0, 2.0)));
        assert!(!hull.contains(&Point2::new(1.0, 1.0)));
    }
}

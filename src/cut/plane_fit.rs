use crate::math::{Point, Real, Unit, Vector};
use crate::utils;

/// A 3D plane fitted through a ring's vertices by least squares.
#[derive(Clone, Debug)]
pub struct Plane3 {
    centroid: Point<Real>,
    normal: Unit<Vector<Real>>,
    basis: [Vector<Real>; 2],
}

/// Result of fitting a plane through a point set.
///
/// The degenerate case is a distinct variant, not a null plane: callers must
/// decide what a collinear ring means for them.
#[derive(Clone, Debug)]
pub enum FittedPlane {
    /// The least-squares plane.
    Defined(Plane3),
    /// The points are (numerically) collinear or too few; no plane exists.
    Undefined,
}

/// A ring's extent projected onto its own best-fit plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProjectedExtent {
    /// The in-plane area and perimeter of the projected ring.
    Planar {
        /// Absolute area of the projected ring.
        area: Real,
        /// Perimeter of the projected ring.
        perimeter: Real,
    },
    /// The ring degenerates to a 1D set; only a scalar extent is
    /// meaningful.
    Linear {
        /// Extent of the point set along its principal axis.
        length: Real,
    },
}

impl Plane3 {
    /// The centroid of the fitted points.
    #[inline]
    pub fn centroid(&self) -> Point<Real> {
        self.centroid
    }

    /// The unit normal of this plane.
    #[inline]
    pub fn normal(&self) -> Unit<Vector<Real>> {
        self.normal
    }

    /// Evaluates the plane's Z at the given X/Y, or `None` for a (near-)
    /// vertical plane.
    pub fn z_at(&self, x: Real, y: Real) -> Option<Real> {
        let n = self.normal.into_inner();

        if n.z.abs() < 1.0e-12 {
            return None;
        }

        Some(self.centroid.z - (n.x * (x - self.centroid.x) + n.y * (y - self.centroid.y)) / n.z)
    }

    /// Projects a point into the plane's 2D parametric basis.
    pub fn project(&self, pt: &Point<Real>) -> na::Point2<Real> {
        let d = pt - self.centroid;
        na::Point2::new(d.dot(&self.basis[0]), d.dot(&self.basis[1]))
    }
}

impl FittedPlane {
    /// Fits a plane through the given points.
    ///
    /// `tolerance` bounds the off-axis spread below which the point set
    /// counts as collinear (and the fit as [`FittedPlane::Undefined`]).
    pub fn fit(points: &[Point<Real>], tolerance: Real) -> FittedPlane {
        if points.len() < 3 {
            return FittedPlane::Undefined;
        }

        let (centroid, cov) = utils::center_cov(points);
        let eigen = na::SymmetricEigen::new(cov);

        // Eigenvalues of the covariance are variances along the principal
        // axes; their square roots compare against length tolerances.
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[a]
                .partial_cmp(&eigen.eigenvalues[b])
                .unwrap()
        });

        let mid_spread = eigen.eigenvalues[order[1]].max(0.0).sqrt();
        if mid_spread <= tolerance.max(1.0e-12) {
            return FittedPlane::Undefined;
        }

        let normal = Unit::new_normalize(eigen.eigenvectors.column(order[0]).into_owned());
        let e1 = eigen.eigenvectors.column(order[2]).into_owned().normalize();
        let e2 = normal.into_inner().cross(&e1);

        FittedPlane::Defined(Plane3 {
            centroid,
            normal,
            basis: [e1, e2],
        })
    }

    /// The plane, if defined.
    pub fn as_defined(&self) -> Option<&Plane3> {
        match self {
            FittedPlane::Defined(plane) => Some(plane),
            FittedPlane::Undefined => None,
        }
    }

    /// Projects a closed ring onto this fit and measures it.
    ///
    /// With a defined plane this is the in-plane area and perimeter; for a
    /// degenerate fit the ring is treated as a 1D set and measured by its
    /// extent along the principal axis.
    pub fn projected_extent(&self, ring: &[Point<Real>]) -> ProjectedExtent {
        match self {
            FittedPlane::Defined(plane) => {
                let projected: Vec<Point<Real>> = ring
                    .iter()
                    .map(|p| {
                        let uv = plane.project(p);
                        Point::new(uv.x, uv.y, 0.0)
                    })
                    .collect();

                ProjectedExtent::Planar {
                    area: utils::signed_area_xy(&projected).abs(),
                    perimeter: utils::perimeter_xy(&projected),
                }
            }
            FittedPlane::Undefined => {
                if ring.len() < 2 {
                    return ProjectedExtent::Linear { length: 0.0 };
                }

                let origin = ring[0];
                let axis = ring
                    .iter()
                    .map(|p| p - origin)
                    .max_by(|a, b| a.norm_squared().partial_cmp(&b.norm_squared()).unwrap())
                    .unwrap();

                match Unit::try_new(axis, 1.0e-12) {
                    None => ProjectedExtent::Linear { length: 0.0 },
                    Some(axis) => {
                        let axis = axis.into_inner();
                        let (lo, hi) = ring.iter().fold((Real::MAX, Real::MIN), |(lo, hi), p| {
                            let d = (p - origin).dot(&axis);
                            (lo.min(d), hi.max(d))
                        });
                        ProjectedExtent::Linear { length: hi - lo }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_a_sloped_roof() {
        // z = 2 + 0.5 * x
        let points = vec![
            Point::new(0.0, 0.0, 2.0),
            Point::new(4.0, 0.0, 4.0),
            Point::new(4.0, 4.0, 4.0),
            Point::new(0.0, 4.0, 2.0),
        ];

        let plane = match FittedPlane::fit(&points, 0.001) {
            FittedPlane::Defined(plane) => plane,
            FittedPlane::Undefined => panic!("expected a defined plane"),
        };

        assert_relative_eq!(plane.z_at(2.0, 1.0).unwrap(), 3.0, epsilon = 1.0e-9);
        assert_relative_eq!(plane.z_at(0.0, 3.0).unwrap(), 2.0, epsilon = 1.0e-9);
    }

    #[test]
    fn collinear_points_have_no_plane() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(2.0, 2.0, 2.0),
            Point::new(3.0, 3.0, 3.0),
        ];

        assert!(matches!(
            FittedPlane::fit(&points, 0.001),
            FittedPlane::Undefined
        ));
    }

    #[test]
    fn vertical_plane_has_no_z() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(4.0, 0.0, 0.0),
            Point::new(4.0, 0.0, 10.0),
            Point::new(0.0, 0.0, 10.0),
        ];

        let fitted = FittedPlane::fit(&points, 0.001);
        let plane = fitted.as_defined().expect("wall should fit a plane");
        assert_eq!(plane.z_at(2.0, 0.0), None);
    }

    #[test]
    fn projected_extent_of_planar_ring() {
        let points = vec![
            Point::new(0.0, 0.0, 2.0),
            Point::new(4.0, 0.0, 4.0),
            Point::new(4.0, 4.0, 4.0),
            Point::new(0.0, 4.0, 2.0),
        ];

        let fitted = FittedPlane::fit(&points, 0.001);
        match fitted.projected_extent(&points) {
            ProjectedExtent::Planar { area, perimeter } => {
                // The sloped edge is sqrt(4² + 2²) long.
                let slope_len = (16.0f64 + 4.0).sqrt();
                assert_relative_eq!(area, slope_len * 4.0, epsilon = 1.0e-9);
                assert_relative_eq!(perimeter, 2.0 * slope_len + 8.0, epsilon = 1.0e-9);
            }
            other => panic!("expected planar extent, got {other:?}"),
        }
    }
}

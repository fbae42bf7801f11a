use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::shape::Path;
use crate::utils;

/// A polygon: closed rings grouped into connected components.
///
/// Exterior rings are counter-clockwise (positive signed XY area), holes are
/// clockwise. A component is one exterior ring plus the holes it contains.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    rings: Vec<Path>,
}

/// One connected component of a polygon: ring indices into
/// [`Polygon::rings`].
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonComponent {
    /// Index of the exterior ring.
    pub exterior: usize,
    /// Indices of the hole rings contained in the exterior.
    pub holes: Vec<usize>,
}

impl Polygon {
    /// Creates a polygon from its rings.
    ///
    /// # Panics
    ///
    /// Panics if any ring is not closed.
    pub fn new(rings: Vec<Path>) -> Self {
        assert!(
            rings.iter().all(|r| r.is_closed()),
            "polygon rings must be closed"
        );
        Polygon { rings }
    }

    /// The rings of this polygon (exteriors and holes interleaved).
    #[inline]
    pub fn rings(&self) -> &[Path] {
        &self.rings
    }

    /// The number of rings of this polygon.
    #[inline]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// The total XY area of this polygon (holes subtract).
    pub fn area_xy(&self) -> Real {
        self.rings.iter().map(|r| r.signed_area_xy()).sum()
    }

    /// The AABB of this polygon.
    pub fn aabb(&self) -> Aabb {
        self.rings
            .iter()
            .fold(Aabb::new_invalid(), |acc, r| acc.merged(&r.aabb()))
    }

    /// Groups the rings of this polygon into connected components.
    ///
    /// Every clockwise ring is assigned to the smallest counter-clockwise
    /// ring containing its first vertex. Holes contained in no exterior are
    /// dropped from the grouping.
    pub fn components(&self) -> Vec<PolygonComponent> {
        let mut components: Vec<PolygonComponent> = Vec::new();

        for (i, ring) in self.rings.iter().enumerate() {
            if ring.signed_area_xy() >= 0.0 {
                components.push(PolygonComponent {
                    exterior: i,
                    holes: Vec::new(),
                });
            }
        }

        for (i, ring) in self.rings.iter().enumerate() {
            if ring.signed_area_xy() >= 0.0 {
                continue;
            }

            let probe = ring.points()[0].xy();
            let mut best: Option<(usize, Real)> = None;

            for (ci, comp) in components.iter().enumerate() {
                let exterior = &self.rings[comp.exterior];
                if utils::point_in_ring_xy(&probe, exterior.points()) {
                    let area = exterior.signed_area_xy();
                    if best.map_or(true, |(_, a)| area < a) {
                        best = Some((ci, area));
                    }
                }
            }

            if let Some((ci, _)) = best {
                components[ci].holes.push(i);
            }
        }

        components
    }
}

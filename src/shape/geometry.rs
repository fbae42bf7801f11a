use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::shape::{Multipatch, Polygon, Polyline};

/// A feature geometry of one of the three supported families.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// A multi-part open curve.
    Polyline(Polyline),
    /// An area bounded by rings.
    Polygon(Polygon),
    /// A 3D shape made of patches.
    Multipatch(Multipatch),
}

/// The geometry family of a [`Geometry`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeometryFamily {
    /// Polyline geometries.
    Polyline,
    /// Polygon geometries.
    Polygon,
    /// Multipatch geometries.
    Multipatch,
}

impl Geometry {
    /// The family of this geometry.
    pub fn family(&self) -> GeometryFamily {
        match self {
            Geometry::Polyline(_) => GeometryFamily::Polyline,
            Geometry::Polygon(_) => GeometryFamily::Polygon,
            Geometry::Multipatch(_) => GeometryFamily::Multipatch,
        }
    }

    /// The AABB of this geometry.
    pub fn aabb(&self) -> Aabb {
        match self {
            Geometry::Polyline(p) => p.aabb(),
            Geometry::Polygon(p) => p.aabb(),
            Geometry::Multipatch(p) => p.aabb(),
        }
    }

    /// A scalar size used to order cut results: XY length for polylines,
    /// XY area otherwise.
    pub fn size(&self) -> Real {
        match self {
            Geometry::Polyline(p) => p.length_xy(),
            Geometry::Polygon(p) => p.area_xy(),
            Geometry::Multipatch(p) => p
                .patches()
                .iter()
                .flat_map(|patch| patch.rings())
                .map(|r| crate::utils::signed_area_xy(r.points()).abs())
                .sum(),
        }
    }
}

/// Spatial reference of a feature: resolution tolerances in dataset units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpatialReference {
    /// Well-known id of the coordinate system, if any.
    pub srid: Option<u32>,
    /// The XY tolerance: points closer than this are coincident.
    pub xy_tolerance: Real,
    /// The Z tolerance.
    pub z_tolerance: Real,
}

impl Default for SpatialReference {
    fn default() -> Self {
        SpatialReference {
            srid: None,
            xy_tolerance: 0.001,
            z_tolerance: 0.001,
        }
    }
}

/// One input feature of a cut operation.
#[derive(Clone, Debug)]
pub struct Feature {
    /// Object id, used as the key of the cut result map.
    pub oid: u64,
    /// Name of the dataset this feature belongs to; selects the Z-source
    /// strategy through the configured provider.
    pub dataset: String,
    /// The spatial reference of the geometry.
    pub srs: SpatialReference,
    /// The feature geometry.
    pub geometry: Geometry,
}

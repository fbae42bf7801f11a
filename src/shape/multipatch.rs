use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use std::sync::Arc;

/// The role a ring plays inside a multipatch patch.
///
/// Mirrors the per-vertex ring marker of multipatch formats: a contiguous
/// vertex run sharing one marker forms one ring.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RingRole {
    /// An outer boundary ring of the patch footprint.
    Footprint,
    /// An inner (hole) ring of the patch footprint.
    Hole,
    /// A vertical wall ring bounding the patch sideways.
    Wall,
}

/// How a patch's vertices are assembled into faces.
///
/// Only ring-based patches have a segment topology the cut engine can reason
/// about; the other kinds exist so unsupported inputs fail fast instead of
/// being silently mis-cut.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatchKind {
    /// Closed rings (footprints, holes, walls).
    Rings,
    /// A raw triangle strip.
    TriangleStrip,
    /// A raw triangle fan.
    TriangleFan,
}

/// One closed ring of a patch, with its role marker.
#[derive(Clone, Debug)]
pub struct PatchRing {
    role: RingRole,
    points: Arc<[Point<Real>]>,
}

impl PatchRing {
    /// Creates a ring from its role and vertices (no closing duplicate).
    ///
    /// # Panics
    ///
    /// Panics if fewer than three vertices are given.
    pub fn new(role: RingRole, points: Vec<Point<Real>>) -> Self {
        assert!(points.len() >= 3, "a patch ring requires at least 3 points");
        PatchRing {
            role,
            points: points.into(),
        }
    }

    /// The role marker of this ring.
    #[inline]
    pub fn role(&self) -> RingRole {
        self.role
    }

    /// The vertices of this ring.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// Shared handle to the vertices, for proxies that must not copy them.
    #[inline]
    pub fn shared_points(&self) -> Arc<[Point<Real>]> {
        self.points.clone()
    }

    /// The AABB of this ring.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.points.iter())
    }
}

/// One logical 3D face-group of a multipatch: a footprint ring with its
/// holes and vertical walls.
#[derive(Clone, Debug)]
pub struct Patch {
    kind: PatchKind,
    rings: Vec<PatchRing>,
    point_id: Option<i32>,
}

impl Patch {
    /// Creates a ring-based patch.
    pub fn new(rings: Vec<PatchRing>) -> Self {
        Patch {
            kind: PatchKind::Rings,
            rings,
            point_id: None,
        }
    }

    /// Creates a patch of the given kind; non-ring kinds carry their raw
    /// vertex runs as a single pseudo-ring.
    pub fn with_kind(kind: PatchKind, rings: Vec<PatchRing>) -> Self {
        Patch {
            kind,
            rings,
            point_id: None,
        }
    }

    /// Attaches a vertex id tag, carried onto every piece cut from this
    /// patch.
    pub fn with_point_id(mut self, id: i32) -> Self {
        self.point_id = Some(id);
        self
    }

    /// How this patch's vertices are assembled.
    #[inline]
    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// The rings (planes) of this patch.
    #[inline]
    pub fn rings(&self) -> &[PatchRing] {
        &self.rings
    }

    /// The vertex id tag of this patch, if any.
    #[inline]
    pub fn point_id(&self) -> Option<i32> {
        self.point_id
    }

    /// The AABB of this patch.
    pub fn aabb(&self) -> Aabb {
        self.rings
            .iter()
            .fold(Aabb::new_invalid(), |acc, r| acc.merged(&r.aabb()))
    }
}

/// A multipatch: a collection of patches forming a 3D shape.
#[derive(Clone, Debug)]
pub struct Multipatch {
    patches: Vec<Patch>,
}

impl Multipatch {
    /// Creates a multipatch from its patches.
    pub fn new(patches: Vec<Patch>) -> Self {
        Multipatch { patches }
    }

    /// The patches of this multipatch.
    #[inline]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Whether every patch is ring-based.
    pub fn is_ring_based(&self) -> bool {
        self.patches.iter().all(|p| p.kind() == PatchKind::Rings)
    }

    /// The AABB of this multipatch.
    pub fn aabb(&self) -> Aabb {
        self.patches
            .iter()
            .fold(Aabb::new_invalid(), |acc, p| acc.merged(&p.aabb()))
    }
}

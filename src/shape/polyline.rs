use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::shape::{Path, Segment};

/// A polyline: a multi-part curve made of open paths.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    paths: Vec<Path>,
}

impl Polyline {
    /// Creates a new polyline from its paths.
    pub fn new(paths: Vec<Path>) -> Self {
        Polyline { paths }
    }

    /// Creates a single-part polyline.
    pub fn single(path: Path) -> Self {
        Polyline { paths: vec![path] }
    }

    /// The paths of this polyline.
    #[inline]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The number of parts of this polyline.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.paths.len()
    }

    /// The total XY length of this polyline.
    pub fn length_xy(&self) -> Real {
        self.paths.iter().map(|p| p.length_xy()).sum()
    }

    /// The AABB of this polyline.
    pub fn aabb(&self) -> Aabb {
        self.paths
            .iter()
            .fold(Aabb::new_invalid(), |acc, p| acc.merged(&p.aabb()))
    }

    /// An iterator through all the segments of all parts, with their
    /// `(part, segment)` indices.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize, Segment)> + '_ {
        self.paths
            .iter()
            .enumerate()
            .flat_map(|(pi, path)| path.segments().enumerate().map(move |(si, seg)| (pi, si, seg)))
    }
}

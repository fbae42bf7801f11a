use crate::math::{Point, Real};
use std::collections::HashMap;

/// Where the Z values of newly created cut vertices come from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ZSource {
    /// Interpolate Z linearly along the original 3D curve at the cut
    /// location.
    #[default]
    InterpolatedSource,
    /// Evaluate the best-fit plane of the containing source ring at the new
    /// vertex's X/Y. Falls back to interpolation where the plane is
    /// undefined or vertical.
    SourcePlane,
    /// Take Z values from the cut line itself.
    Target,
}

/// Resolves the Z-source strategy for a feature, keyed by the name of the
/// dataset it belongs to.
pub trait ZSourceProvider {
    /// The strategy to use for features of the given dataset.
    fn z_source(&self, dataset: &str) -> ZSource;
}

/// A provider returning the same strategy for every dataset.
#[derive(Copy, Clone, Debug, Default)]
pub struct FixedZSource(pub ZSource);

impl ZSourceProvider for FixedZSource {
    fn z_source(&self, _dataset: &str) -> ZSource {
        self.0
    }
}

/// A provider with per-dataset strategies and a fallback default.
#[derive(Clone, Debug, Default)]
pub struct DatasetZSources {
    default: ZSource,
    by_dataset: HashMap<String, ZSource>,
}

impl DatasetZSources {
    /// Creates a provider with the given fallback strategy.
    pub fn new(default: ZSource) -> Self {
        DatasetZSources {
            default,
            by_dataset: HashMap::new(),
        }
    }

    /// Sets the strategy for one dataset.
    pub fn set(&mut self, dataset: impl Into<String>, z_source: ZSource) {
        let _ = self.by_dataset.insert(dataset.into(), z_source);
    }
}

impl ZSourceProvider for DatasetZSources {
    fn z_source(&self, dataset: &str) -> ZSource {
        self.by_dataset.get(dataset).copied().unwrap_or(self.default)
    }
}

/// Replaces every NaN Z in `points` by linear interpolation (by XY
/// distance) between the nearest vertices with defined Z, wrapping around
/// for closed rings.
///
/// Returns the index of the first vertex that could not be resolved, if any
/// (i.e. when no vertex carries a defined Z).
pub(crate) fn interpolate_undefined_zs(points: &mut [Point<Real>], closed: bool) -> Option<usize> {
    let n = points.len();
    let any_defined = points.iter().any(|p| !p.z.is_nan());

    if !any_defined {
        return points.iter().position(|p| p.z.is_nan());
    }

    let original: Vec<Point<Real>> = points.to_vec();

    for i in 0..n {
        if !original[i].z.is_nan() {
            continue;
        }

        let mut before = None;
        let mut dist_before = 0.0;
        let mut cursor = i;
        for _ in 0..n {
            let prev = if cursor == 0 {
                if !closed {
                    break;
                }
                n - 1
            } else {
                cursor - 1
            };
            dist_before += (original[cursor].xy() - original[prev].xy()).norm();
            cursor = prev;
            if !original[cursor].z.is_nan() {
                before = Some(cursor);
                break;
            }
        }

        let mut after = None;
        let mut dist_after = 0.0;
        cursor = i;
        for _ in 0..n {
            let next = if cursor == n - 1 {
                if !closed {
                    break;
                }
                0
            } else {
                cursor + 1
            };
            dist_after += (original[next].xy() - original[cursor].xy()).norm();
            cursor = next;
            if !original[cursor].z.is_nan() {
                after = Some(cursor);
                break;
            }
        }

        points[i].z = match (before, after) {
            (Some(b), Some(a)) => {
                let total = dist_before + dist_after;
                if total == 0.0 {
                    original[b].z
                } else {
                    original[b].z + (original[a].z - original[b].z) * dist_before / total
                }
            }
            (Some(b), None) => original[b].z,
            (None, Some(a)) => original[a].z,
            (None, None) => return Some(i),
        };
    }

    None
}

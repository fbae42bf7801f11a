use crate::math::Real;

/// Errors raised by the cut engine.
///
/// "Cannot cut" is *not* among them: a cut line that misses the geometry or
/// collapses onto an existing boundary yields an empty result list, never an
/// error.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CutError {
    /// The geometry contains a patch whose segment topology the engine
    /// cannot reason about (triangle strips, fans).
    #[error("unsupported geometry in patch {patch}: {reason}")]
    UnsupportedGeometry {
        /// Index of the offending patch.
        patch: usize,
        /// Why the patch is unsupported.
        reason: &'static str,
    },

    /// The cut results do not add up to the original size within the
    /// configured relative tolerance.
    #[error(
        "the cut operation changed the feature size from {original} to {result} \
         (relative tolerance {tolerance})"
    )]
    SizeNotConserved {
        /// Size (area or length) of the input geometry.
        original: Real,
        /// Summed size of the results.
        result: Real,
        /// The relative tolerance that was exceeded.
        tolerance: Real,
    },

    /// A multipatch cut produced a result with a degenerate footprint and
    /// the policy asked to fail.
    #[error("the multipatch cut operation resulted in a degenerate footprint (result part {part})")]
    DegenerateResultGeometry {
        /// Index of the degenerate result part.
        part: usize,
    },

    /// A result vertex ended up without a usable Z value.
    #[error("result part {part} carries an undefined Z value at vertex {vertex}")]
    UndefinedResultZ {
        /// Index of the result part.
        part: usize,
        /// Index of the offending vertex.
        vertex: usize,
    },

    /// A cut piece of a patch could not be assigned to exactly one footprint
    /// part.
    #[error("cut piece of patch {patch} intersects {count} footprint parts, expected exactly 1")]
    AmbiguousFootprintAssignment {
        /// Index of the source patch.
        patch: usize,
        /// Number of candidate footprint parts.
        count: usize,
    },
}

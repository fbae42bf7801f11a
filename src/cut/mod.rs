//! The feature-cutting engine and its building blocks.

pub use self::engine::{CutOptions, DegenerateFootprintPolicy, FeatureCutter};
pub use self::error::CutError;
pub use self::part_list::{ReconstructedPath, SegmentPart, SegmentPartList};
pub use self::plane_fit::{FittedPlane, Plane3, ProjectedExtent};
pub use self::zsource::{DatasetZSources, FixedZSource, ZSource, ZSourceProvider};

mod engine;
mod error;
mod part_list;
mod plane_fit;
mod ring_cutter;
mod wall;
mod zsource;

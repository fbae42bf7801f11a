//! Geometry primitives and the feature geometry model.

pub use self::geometry::{Feature, Geometry, GeometryFamily, SpatialReference};
pub use self::multipatch::{Multipatch, Patch, PatchKind, PatchRing, RingRole};
pub use self::path::Path;
pub use self::polygon::{Polygon, PolygonComponent};
pub use self::polyline::Polyline;
pub use self::segment::{Segment, SegmentPointLocation, SegmentProjection};

mod geometry;
mod multipatch;
mod path;
mod polygon;
mod polyline;
mod segment;

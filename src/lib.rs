/*!
ridgeline
=========

**ridgeline** is a segment-level computational-geometry layer and a
feature-cutting engine for GIS-style geometries, written with the rust
programming language.

It addresses polylines, polygons and multipatches segment-by-segment
through a uniform proxy abstraction, and splits a feature's geometry
along an arbitrary cutting line while re-deriving elevation (Z) values
and distributing inner rings and vertical wall rings among the
resulting parts.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)] // Maybe revisit this one later.
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate either;
pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod cut;
pub mod proxy;
pub mod shape;
pub mod utils;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type used throughout this crate.
    ///
    /// GIS coordinates do not survive `f32`: a building footprint expressed
    /// in a projected coordinate system easily carries seven significant
    /// digits before its first fractional one.
    pub use f64 as Real;

    pub use na::{Point2, Point3, Unit, UnitVector3, Vector2, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the ambient space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;
}

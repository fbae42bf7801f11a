//! Axis-aligned bounding boxes.

pub use self::aabb::Aabb;

mod aabb;

//! Core math types: glam re-exports, bounding boxes and the fit transform.

pub use glam::{Mat4, Vec3, vec3};

pub mod bounds;
pub mod transform;

pub use bounds::Aabb;
pub use transform::{FitTransform, TARGET_EXTENT};

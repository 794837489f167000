//! Vectors, affine transforms, and rotation conventions.

mod euler;
mod transform;
mod vector3;

pub use euler::{Rotation, RotationConvention};
pub use transform::Transform;
pub use vector3::Vec3;

//! Rigid-body transform and Euler-angle algebra for single-particle cryo-EM.
//!
//! `cryoem-core` provides the geometric building blocks that orientation
//! assignment and symmetry handling are built on: a 3-vector, a 4x4 affine
//! transform with pre/post translation semantics, and conversions between the
//! Euler conventions in circulation across cryo-EM packages.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`matrix`] | [`Vec3`], [`Transform`], rotation conventions |
//! | [`angle`] | Degree-domain wrapping helpers |
//! | [`params`] | Typed parameter map for string-driven construction |
//! | [`constants`] | Angular constants and shared tolerances |
//! | [`errors`] | [`GeomError`] and [`GeomResult`] |
//!
//! # Conventions
//!
//! - Angles are **degrees** at every public boundary; radians appear only
//!   inside trigonometric conversions.
//! - A [`Transform`] is the identity when freshly constructed and is mutated
//!   only through its setters and by composition.
//! - The *pole* of an orientation is the image of `(0, 0, 1)` under the
//!   transpose action, `Vec3::z_axis() * &t`; asymmetric-unit predicates and
//!   orientation generators are phrased in terms of it.
//!
//! # Re-exports
//!
//! Common types are re-exported at the crate root:
//!
//! ```
//! use cryoem_core::{GeomError, GeomResult, Rotation, RotationConvention, Transform, Vec3};
//! ```

pub mod angle;
pub mod constants;
pub mod errors;
pub mod math;
pub mod matrix;
pub mod params;

pub use errors::{GeomError, GeomResult};
pub use matrix::{Rotation, RotationConvention, Transform, Vec3};
pub use params::{ParamValue, Params};

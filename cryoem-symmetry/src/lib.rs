//! Point-group symmetry and orientation generation for single-particle
//! cryo-EM.
//!
//! Built on [`cryoem_core`], this crate provides:
//!
//! - [`SymmetryGroup`]: cyclic, dihedral, helical, and platonic point groups
//!   with their elements, asymmetric-unit delimiters, membership tests, and
//!   spherical triangulations;
//! - [`SymmetryGroup::reduce`]: mapping any rotation into a chosen
//!   asymmetric unit;
//! - [`OrientationGenerator`]: five strategies for tiling an asymmetric unit
//!   with quasi-uniform view directions.
//!
//! ```
//! use cryoem_symmetry::{OrientationGenerator, OrientationSpec, SymmetryGroup};
//!
//! let sym = SymmetryGroup::parse("d2").unwrap();
//! let views = OrientationGenerator::saff(OrientationSpec::with_delta(8.0))
//!     .generate(&sym)
//!     .unwrap();
//! for view in &views {
//!     let (az, alt, _phi) = view.eman_angles();
//!     assert!(sym.is_in_asym_unit(alt, az, false) || alt == 0.0);
//! }
//! ```

pub mod errors;
pub mod groups;
pub mod orient;
mod reduce;

pub use errors::{SymmetryError, SymmetryResult};
pub use groups::{
    CyclicSym, Delimiters, DihedralSym, HelicalSym, IcosahedralSym, OctahedralSym, PointGroup,
    SymmetryGroup, TetrahedralSym,
};
pub use orient::{
    EmanGenerator, EvenGenerator, OptimumGenerator, OrientationGenerator, OrientationSpec,
    RandomGenerator, SaffGenerator,
};

pub use cryoem_core::{Params, Rotation, RotationConvention, Transform, Vec3};

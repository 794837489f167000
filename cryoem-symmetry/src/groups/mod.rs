//! Point-group symmetries and their asymmetric units.
//!
//! A symmetry group here is a finite set of rotations (plus, for helical
//! symmetry, screw translations) under which a particle is invariant. Each
//! group knows its elements and the *asymmetric unit*: the smallest patch of
//! the unit sphere whose images under the group tile the whole sphere.
//! Orientation generators only ever sample that patch.
//!
//! # Families
//!
//! | Name | Order | Asymmetric unit |
//! |------|-------|-----------------|
//! | `c<n>` | n | alt in [0, 90], az in [0, 360/n] (alt to 180 with mirror) |
//! | `d<n>` | 2n | alt in [0, 90], az in [0, 180/n] (360/n with mirror) |
//! | `h<n>` | strip | alt in [90, 90 + equator_range], az in [0, 360/n] |
//! | `tet` | 12 | spherical triangle per Baldwin-Penczek |
//! | `oct` | 24 | spherical triangle per Baldwin-Penczek |
//! | `icos` | 60 | spherical triangle per Baldwin-Penczek |
//! | `i` | 1 | the whole sphere (alias for `c1`) |
//!
//! Membership tests take `(alt, az)` in degrees; `inc_mirror` widens the
//! unit to cover both mirror halves.
//!
//! ```
//! use cryoem_symmetry::SymmetryGroup;
//!
//! let sym = SymmetryGroup::parse("c4").unwrap();
//! assert_eq!(sym.order(), 4);
//! assert!(sym.is_in_asym_unit(45.0, 30.0, false));
//! assert!(!sym.is_in_asym_unit(45.0, 100.0, false));
//! ```

mod cyclic;
mod dihedral;
mod helical;
mod platonic;

pub use cyclic::CyclicSym;
pub use dihedral::DihedralSym;
pub use helical::HelicalSym;
pub use platonic::{IcosahedralSym, OctahedralSym, TetrahedralSym};

use cryoem_core::{Transform, Vec3};

use crate::errors::{SymmetryError, SymmetryResult};

/// Angular extents of an asymmetric unit, in degrees.
///
/// `alt_min` is zero for every family except helical symmetry, whose unit is
/// a strip around the equator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delimiters {
    pub alt_min: f64,
    pub alt_max: f64,
    pub az_max: f64,
}

/// The capability surface shared by every symmetry family.
///
/// [`SymmetryGroup`] dispatches to these by exhaustive match; generator and
/// reduction code is written against the enum, not the trait objects.
pub trait PointGroup {
    /// Group order: the number of elements enumerated by [`get_sym`](Self::get_sym).
    fn order(&self) -> i32;

    /// The k-th group element.
    fn get_sym(&self, k: i32) -> Transform;

    /// Angular extents of the asymmetric unit.
    fn get_delimiters(&self, inc_mirror: bool) -> Delimiters;

    /// Whether the direction `(alt, az)` (degrees) lies in the asymmetric unit.
    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool;

    /// The polygon of unit vectors bounding the asymmetric unit.
    ///
    /// Empty when the unit is the whole sphere (C1 with mirror) or has no
    /// spherical-polygon description (helical strip).
    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3>;

    /// The bounding polygon fanned into oriented triangles.
    ///
    /// The fan shares the first vertex: `(v0, v2, v1), (v0, v3, v2), ...`,
    /// wound outward for the ray tests in reduction.
    fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]>;

    /// Azimuthal offset applied when aligning generated orientations to the
    /// group's face convention.
    fn get_az_alignment_offset(&self) -> f64 {
        0.0
    }

    /// The order of the principal rotation about z.
    fn get_max_csym(&self) -> i32;
}

/// A point-group symmetry: cyclic, dihedral, helical, or platonic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymmetryGroup {
    Cyclic(CyclicSym),
    Dihedral(DihedralSym),
    Helical(HelicalSym),
    Tetrahedral(TetrahedralSym),
    Octahedral(OctahedralSym),
    Icosahedral(IcosahedralSym),
}

impl SymmetryGroup {
    /// Parses a symmetry name.
    ///
    /// The grammar is case-insensitive: `c<n>`, `d<n>`, `h<n>`, `tet`,
    /// `oct`, `icos`, and the bare `i` denoting the trivial group C1.
    ///
    /// # Errors
    ///
    /// [`SymmetryError::UnknownSymmetry`] for anything else, including the
    /// empty string; [`SymmetryError::InvalidParameter`] for `n <= 0`.
    pub fn parse(name: &str) -> SymmetryResult<Self> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "" => Err(SymmetryError::unknown_symmetry(name)),
            "i" => Ok(Self::Cyclic(CyclicSym::new(1)?)),
            "tet" => Ok(Self::Tetrahedral(TetrahedralSym::new())),
            "oct" => Ok(Self::Octahedral(OctahedralSym::new())),
            "icos" => Ok(Self::Icosahedral(IcosahedralSym::new())),
            _ if lower.is_char_boundary(1) => {
                let (family, digits) = lower.split_at(1);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(SymmetryError::unknown_symmetry(name));
                }
                let nsym: i32 = digits
                    .parse()
                    .map_err(|_| SymmetryError::unknown_symmetry(name))?;
                match family {
                    "c" => Ok(Self::Cyclic(CyclicSym::new(nsym)?)),
                    "d" => Ok(Self::Dihedral(DihedralSym::new(nsym)?)),
                    "h" => Ok(Self::Helical(HelicalSym::with_defaults(nsym)?)),
                    _ => Err(SymmetryError::unknown_symmetry(name)),
                }
            }
            _ => Err(SymmetryError::unknown_symmetry(name)),
        }
    }

    /// Parses a symmetry name with construction parameters.
    ///
    /// Only helical symmetry consumes parameters: `daz` (degrees), `dz`
    /// (pixels), `apix`, and `equator_range` (degrees). Other names ignore
    /// the map.
    pub fn parse_with_params(
        name: &str,
        params: &cryoem_core::Params,
    ) -> SymmetryResult<Self> {
        let parsed = Self::parse(name)?;
        if let Self::Helical(h) = &parsed {
            let helical = HelicalSym::new(
                h.nsym(),
                params.get_float_or("daz", 0.0)?,
                params.get_float_or("dz", 0.0)?,
                params.get_float_or("apix", 1.0)?,
                params.get_float_or("equator_range", HelicalSym::DEFAULT_EQUATOR_RANGE)?,
            )?;
            return Ok(Self::Helical(helical));
        }
        Ok(parsed)
    }

    /// The canonical lowercase name of this group.
    pub fn name(&self) -> String {
        match self {
            Self::Cyclic(s) => format!("c{}", s.nsym()),
            Self::Dihedral(s) => format!("d{}", s.nsym()),
            Self::Helical(s) => format!("h{}", s.nsym()),
            Self::Tetrahedral(_) => "tet".to_string(),
            Self::Octahedral(_) => "oct".to_string(),
            Self::Icosahedral(_) => "icos".to_string(),
        }
    }

    pub fn is_c_sym(&self) -> bool {
        matches!(self, Self::Cyclic(_))
    }

    pub fn is_d_sym(&self) -> bool {
        matches!(self, Self::Dihedral(_))
    }

    pub fn is_h_sym(&self) -> bool {
        matches!(self, Self::Helical(_))
    }

    pub fn is_tet_sym(&self) -> bool {
        matches!(self, Self::Tetrahedral(_))
    }

    pub fn is_platonic_sym(&self) -> bool {
        matches!(
            self,
            Self::Tetrahedral(_) | Self::Octahedral(_) | Self::Icosahedral(_)
        )
    }

    pub fn order(&self) -> i32 {
        self.dispatch(|g| g.order())
    }

    pub fn get_sym(&self, k: i32) -> Transform {
        self.dispatch(|g| g.get_sym(k))
    }

    pub fn get_delimiters(&self, inc_mirror: bool) -> Delimiters {
        self.dispatch(|g| g.get_delimiters(inc_mirror))
    }

    pub fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        self.dispatch(|g| g.is_in_asym_unit(alt, az, inc_mirror))
    }

    pub fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        self.dispatch(|g| g.get_asym_unit_points(inc_mirror))
    }

    pub fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]> {
        self.dispatch(|g| g.get_asym_unit_triangles(inc_mirror))
    }

    pub fn get_az_alignment_offset(&self) -> f64 {
        self.dispatch(|g| g.get_az_alignment_offset())
    }

    pub fn get_max_csym(&self) -> i32 {
        self.dispatch(|g| g.get_max_csym())
    }

    fn dispatch<T>(&self, f: impl FnOnce(&dyn PointGroup) -> T) -> T {
        match self {
            Self::Cyclic(s) => f(s),
            Self::Dihedral(s) => f(s),
            Self::Helical(s) => f(s),
            Self::Tetrahedral(s) => f(s),
            Self::Octahedral(s) => f(s),
            Self::Icosahedral(s) => f(s),
        }
    }
}

/// Fans a bounding polygon into oriented triangles sharing the first vertex.
pub(crate) fn fan_triangles(points: &[Vec3]) -> Vec<[Vec3; 3]> {
    match points.len() {
        3 => vec![[points[0], points[2], points[1]]],
        4 => vec![
            [points[0], points[2], points[1]],
            [points[0], points[3], points[2]],
        ],
        _ => Vec::new(),
    }
}

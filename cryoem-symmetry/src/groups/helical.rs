//! Helical symmetry H: a continuous screw discretized into `nsym` azimuthal
//! units, each a rotation by `daz` degrees plus a rise of `dz` pixels.

use cryoem_core::constants::DEG_TO_RAD;
use cryoem_core::{Transform, Vec3};

use crate::errors::{SymmetryError, SymmetryResult};
use crate::groups::{Delimiters, PointGroup};

/// Helical (screw) symmetry.
///
/// Unlike the point groups, the asymmetric unit is not a spherical polygon
/// but a strip around the equator: `alt` in `[90, 90 + equator_range]`
/// degrees (extending below the equator when the mirror is included).
/// Elements are indexed by any integer `k`, positive or negative, walking
/// the screw in either direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HelicalSym {
    nsym: i32,
    daz: f64,
    dz: f64,
    apix: f64,
    equator_range: f64,
}

impl HelicalSym {
    pub const DEFAULT_EQUATOR_RANGE: f64 = 5.0;

    /// Creates a helical symmetry with the given azimuthal step `daz`
    /// (degrees), rise `dz` (pixels), pixel size `apix`, and equator slab
    /// half-width (degrees).
    pub fn new(
        nsym: i32,
        daz: f64,
        dz: f64,
        apix: f64,
        equator_range: f64,
    ) -> SymmetryResult<Self> {
        if nsym <= 0 {
            return Err(SymmetryError::invalid_parameter(
                "helical symmetry",
                format!("nsym must be positive, got {}", nsym),
            ));
        }
        if apix <= 0.0 {
            return Err(SymmetryError::invalid_parameter(
                "helical symmetry",
                format!("apix must be positive, got {}", apix),
            ));
        }
        if equator_range < 0.0 {
            return Err(SymmetryError::invalid_parameter(
                "helical symmetry",
                format!("equator_range must be non-negative, got {}", equator_range),
            ));
        }
        Ok(Self {
            nsym,
            daz,
            dz,
            apix,
            equator_range,
        })
    }

    /// A rotation-only helix with default equator range, as produced by
    /// parsing a bare `h<n>` name.
    pub fn with_defaults(nsym: i32) -> SymmetryResult<Self> {
        Self::new(nsym, 0.0, 0.0, 1.0, Self::DEFAULT_EQUATOR_RANGE)
    }

    pub fn nsym(&self) -> i32 {
        self.nsym
    }

    pub fn equator_range(&self) -> f64 {
        self.equator_range
    }
}

impl PointGroup for HelicalSym {
    fn order(&self) -> i32 {
        self.nsym
    }

    fn get_sym(&self, k: i32) -> Transform {
        let mut t = Transform::from_eman(k as f64 * self.daz, 0.0, 0.0);
        t.set_posttrans(Vec3::new(0.0, 0.0, k as f64 * self.dz / self.apix));
        t
    }

    fn get_delimiters(&self, _inc_mirror: bool) -> Delimiters {
        Delimiters {
            alt_min: 90.0,
            alt_max: 90.0 + self.equator_range,
            az_max: 360.0 / self.nsym as f64,
        }
    }

    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        let d = self.get_delimiters(inc_mirror);
        let alt_min = if inc_mirror {
            d.alt_min - self.equator_range
        } else {
            d.alt_min
        };
        alt >= alt_min && alt <= d.alt_max && az >= 0.0 && az <= d.az_max
    }

    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        let d = self.get_delimiters(inc_mirror);
        let a = Vec3::new(0.0, -1.0, 0.0);
        let mut points = vec![a];
        if self.nsym > 2 {
            let angle = d.az_max * DEG_TO_RAD;
            points.push(Vec3::new(libm::sin(angle), -libm::cos(angle), 0.0));
        } else {
            points.push(Vec3::new(1.0, 0.0, 0.0));
            points.push(Vec3::new(0.0, 1.0, 0.0));
            if self.nsym == 1 {
                points.push(Vec3::new(-1.0, 0.0, 0.0));
                points.push(a);
            }
        }
        points
    }

    fn get_asym_unit_triangles(&self, _inc_mirror: bool) -> Vec<[Vec3; 3]> {
        // The equatorial strip has no spherical-polygon triangulation.
        Vec::new()
    }

    fn get_max_csym(&self) -> i32 {
        self.nsym
    }
}

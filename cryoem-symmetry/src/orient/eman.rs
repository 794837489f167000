//! The classic latitude-banded tiling with a hexagonal-mesh azimuth step.

use cryoem_core::constants::{DEG_TO_RAD, RAD_TO_DEG, TWOPI};
use cryoem_core::Transform;

use crate::errors::SymmetryResult;
use crate::groups::SymmetryGroup;
use crate::orient::{add_orientation, gauss, optimal_delta, OrientationSpec};

/// Latitude-band generator with the azimuthal step adapted to `sin(alt)` so
/// the points approximate a hexagonal mesh.
///
/// Boundary handling is where all the subtlety lives: at the equator of an
/// odd cyclic group without mirror, half the arc is redundant; at the
/// azimuthal boundary of cyclic and tetrahedral units (and of dihedral and
/// platonic units when the mirror is included) the full arc would be
/// double-counted, so a quarter step is shaved off.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmanGenerator {
    spec: OrientationSpec,
}

impl EmanGenerator {
    pub fn new(spec: OrientationSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &OrientationSpec {
        &self.spec
    }

    /// The azimuthal step (degrees) at the given altitude.
    ///
    /// `360 / (delta * 2/sqrt(3))` points would tile the equator in a
    /// hexagonal mesh; the count shrinks with `sin(alt)` toward the pole and
    /// snaps to a multiple of the principal symmetry so that rings close.
    fn az_step(delta: f64, alt: f64, max_csym: i32) -> f64 {
        let alt_rad = alt * DEG_TO_RAD;
        let mut h = libm::floor(360.0 / (delta * 1.1547));
        h = libm::floor(h * libm::sin(alt_rad) + 0.5);
        if h == 0.0 {
            h = 1.0;
        }
        h = max_csym as f64 * libm::floor(h / max_csym as f64 + 0.5);
        if h == 0.0 {
            h = max_csym as f64;
        }
        (TWOPI / h) * RAD_TO_DEG
    }

    /// Runs the band scan, calling `emit(az, alt, h)` for every accepted
    /// grid point. Generation and tallying share this loop.
    fn scan(&self, sym: &SymmetryGroup, delta: f64, mut emit: impl FnMut(f64, f64, f64)) {
        let inc_mirror = self.spec.inc_mirror;
        let delimiters = sym.get_delimiters(inc_mirror);
        let alt_max = delimiters.alt_max;
        let az_max = delimiters.az_max;

        // Helical units are a strip around the equator, not a cap.
        let alt_min = if sym.is_h_sym() { delimiters.alt_min } else { 0.0 };

        let mut alt = alt_min;
        while alt <= alt_max {
            let mut h = Self::az_step(delta, alt, sym.get_max_csym());
            if alt > 0.0 && az_max / h < 2.8 {
                h = az_max / 2.1;
            } else if alt == 0.0 {
                h = az_max;
            }

            let mut az_max_adjusted = az_max;
            if sym.is_c_sym() && !inc_mirror && alt == alt_max && sym.order() % 2 == 1 {
                // Half the equator of an odd cyclic group mirrors the other.
                az_max_adjusted /= 2.0;
            } else if sym.is_c_sym() || sym.is_tet_sym() {
                // The azimuthal boundary is a full circle; don't count it twice.
                az_max_adjusted -= h / 4.0;
            } else if inc_mirror && (sym.is_d_sym() || sym.is_platonic_sym()) {
                az_max_adjusted -= h / 4.0;
            }

            let mut az = 0.0;
            while az <= az_max_adjusted {
                if sym.is_platonic_sym() && !sym.is_in_asym_unit(alt, az, inc_mirror) {
                    az += h;
                    continue;
                }
                emit(az, alt, h);
                az += h;
            }
            alt += delta;
        }
    }

    /// Counts the orientations emitted at the given step.
    pub fn tally(&self, sym: &SymmetryGroup, delta: f64) -> usize {
        let delimiters = sym.get_delimiters(self.spec.inc_mirror);
        let mirror_h = sym.is_h_sym() && self.spec.inc_mirror;
        let mut count = 0;
        self.scan(sym, delta, |_az, alt, _h| {
            count += 1;
            if mirror_h && alt != delimiters.alt_min {
                count += 1;
            }
        });
        count
    }

    pub fn generate(&self, sym: &SymmetryGroup) -> SymmetryResult<Vec<Transform>> {
        self.spec.validate("eman")?;
        let delta = match self.spec.delta {
            Some(delta) => delta,
            None => {
                let n = self.spec.n.unwrap();
                optimal_delta(sym, n, |sym, delta| self.tally(sym, delta))
            }
        };

        let delimiters = sym.get_delimiters(self.spec.inc_mirror);
        let mirror_h = sym.is_h_sym() && self.spec.inc_mirror;
        let mut rng = self.spec.make_rng();
        let mut ret = Vec::new();

        self.scan(sym, delta, |az, alt, h| {
            let mut az_soln = az;
            let mut alt_soln = alt;
            if sym.is_platonic_sym() {
                az_soln += sym.get_az_alignment_offset();
            }
            if self.spec.perturb && alt_soln != 0.0 {
                alt_soln += gauss(&mut rng, 0.25 * delta);
                az_soln += gauss(&mut rng, h / 4.0);
            }
            add_orientation(&mut ret, az_soln, alt_soln, &mut rng, &self.spec);
            if mirror_h && alt != delimiters.alt_min {
                add_orientation(
                    &mut ret,
                    az_soln,
                    2.0 * delimiters.alt_min - alt_soln,
                    &mut rng,
                    &self.spec,
                );
            }
        });

        Ok(ret)
    }
}

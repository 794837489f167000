//! The Saff-Kuijlaars spiral tiling.

use cryoem_core::constants::{DEG_TO_RAD, PI, RAD_TO_DEG};
use cryoem_core::math::fmod;
use cryoem_core::Transform;

use crate::errors::SymmetryResult;
use crate::groups::SymmetryGroup;
use crate::orient::{add_orientation, optimal_delta, OrientationSpec};

/// Spiral generator: walks a single spiral from pole to boundary, advancing
/// the azimuth by `delta / r` at each of `N` evenly spaced heights, where
/// `N = round((3.6/s)^2 * |dz * az_max / 720|)` for step `s` in radians.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaffGenerator {
    spec: OrientationSpec,
}

impl SaffGenerator {
    pub fn new(spec: OrientationSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &OrientationSpec {
        &self.spec
    }

    fn scan(&self, sym: &SymmetryGroup, delta: f64, mut emit: impl FnMut(f64, f64)) {
        let inc_mirror = self.spec.inc_mirror;
        let delimiters = sym.get_delimiters(inc_mirror);
        let alt_max = delimiters.alt_max;
        let az_max = delimiters.az_max;

        let mut alt_min = 0.0;
        if let SymmetryGroup::Helical(h) = sym {
            alt_min = delimiters.alt_min;
            if inc_mirror {
                alt_min -= h.equator_range();
            }
        }

        let delta_z = libm::cos(alt_max * DEG_TO_RAD) - libm::cos(alt_min * DEG_TO_RAD);
        let s = delta * PI / 180.0;
        let n_factor = 3.6 / s;
        let wedge_factor = libm::fabs(delta_z * az_max / 720.0);
        let num_points = libm::round(n_factor * n_factor * wedge_factor) as i64;

        if !sym.is_h_sym() {
            emit(0.0, 0.0);
        }

        let mut az = 0.0;
        let z0 = libm::cos(alt_min * DEG_TO_RAD);
        for i in 1..num_points {
            let z = z0 + delta_z * i as f64 / (num_points - 1) as f64;
            let r = libm::sqrt((1.0 - z * z).max(0.0));
            az = fmod(az + delta / r, az_max);
            let alt = libm::acos(z.clamp(-1.0, 1.0)) * RAD_TO_DEG;
            if sym.is_platonic_sym() && !sym.is_in_asym_unit(alt, az, inc_mirror) {
                continue;
            }
            emit(az, alt);
        }
    }

    /// Counts the orientations emitted at the given step.
    pub fn tally(&self, sym: &SymmetryGroup, delta: f64) -> usize {
        let mut count = 0;
        self.scan(sym, delta, |_az, _alt| count += 1);
        count
    }

    pub fn generate(&self, sym: &SymmetryGroup) -> SymmetryResult<Vec<Transform>> {
        self.spec.validate("saff")?;
        let delta = match self.spec.delta {
            Some(delta) => delta,
            None => {
                let n = self.spec.n.unwrap();
                optimal_delta(sym, n, |sym, delta| self.tally(sym, delta))
            }
        };

        let mut rng = self.spec.make_rng();
        let mut ret = Vec::new();
        self.scan(sym, delta, |az, alt| {
            add_orientation(&mut ret, az, alt, &mut rng, &self.spec);
        });
        Ok(ret)
    }
}

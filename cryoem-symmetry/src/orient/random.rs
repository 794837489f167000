//! Uniform random orientations, reduced into the asymmetric unit.

use rand::Rng;

use cryoem_core::{Transform, Vec3};

use crate::errors::{SymmetryError, SymmetryResult};
use crate::groups::SymmetryGroup;
use crate::orient::OrientationSpec;

/// Rejection-sampling generator: draws uniform directions on the sphere
/// (Marsaglia's disk method) and reduces each through the group so the pole
/// lands in the asymmetric unit. Driven by a target count `n`; an angular
/// step makes no sense here and is rejected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomGenerator {
    spec: OrientationSpec,
}

impl RandomGenerator {
    pub fn new(spec: OrientationSpec) -> SymmetryResult<Self> {
        if spec.delta.is_some() {
            return Err(SymmetryError::invalid_parameter(
                "rand",
                "the random generator takes n, not delta",
            ));
        }
        match spec.n {
            Some(n) if n > 0 => Ok(Self { spec }),
            _ => Err(SymmetryError::invalid_parameter(
                "rand",
                "a positive n is required",
            )),
        }
    }

    pub fn spec(&self) -> &OrientationSpec {
        &self.spec
    }

    pub fn generate(&self, sym: &SymmetryGroup) -> SymmetryResult<Vec<Transform>> {
        let n = self.spec.n.unwrap() as usize;
        let mut rng = self.spec.make_rng();
        let mut ret = Vec::with_capacity(n);

        while ret.len() < n {
            let u1: f64 = rng.random_range(-1.0..1.0);
            let u2: f64 = rng.random_range(-1.0..1.0);
            let s = u1 * u1 + u2 * u2;
            if s > 1.0 {
                continue;
            }
            let scale = 2.0 * libm::sqrt(1.0 - s);
            let direction = Vec3::new(scale * u1, scale * u2, 2.0 * s - 1.0);

            let (alt, az) = direction.to_alt_az();
            let phi = if self.spec.random_phi {
                rng.random_range(0.0..360.0)
            } else {
                0.0
            };
            let t = Transform::from_eman(az, alt, phi);
            ret.push(sym.reduce(&t, 0)?);
        }
        Ok(ret)
    }
}

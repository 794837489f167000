//! Orientation generators: quasi-uniform tilings of an asymmetric unit.
//!
//! Projection matching needs a set of view directions that covers one
//! asymmetric unit of the target symmetry as evenly as possible. Five
//! strategies are provided, all producing `Transform`s whose poles lie in
//! the unit:
//!
//! | Name | Strategy |
//! |------|----------|
//! | `eman` | latitude bands, azimuth step matched to `sin(alt)` for a near-hexagonal mesh |
//! | `even` | latitude bands with plain equispaced azimuths |
//! | `saff` | a single spiral over the collapsing latitude circles |
//! | `rand` | rejection-sampled uniform directions, reduced into the unit |
//! | `opt` | any of the above over the full sphere, relaxed by nearest-pair repulsion |
//!
//! Generators are configured by an [`OrientationSpec`]: either an angular
//! step `delta` (degrees) or a target count `n` (converted to a `delta` by
//! bisection against the generator's own tally), plus the mirror flag and
//! the phi policy. Each `generate` call owns its RNG; pass a seed for
//! reproducible output.
//!
//! ```
//! use cryoem_symmetry::{OrientationGenerator, OrientationSpec, SymmetryGroup};
//!
//! let sym = SymmetryGroup::parse("c4").unwrap();
//! let generator = OrientationGenerator::eman(OrientationSpec::with_delta(10.0));
//! let views = generator.generate(&sym).unwrap();
//! assert!(!views.is_empty());
//! ```

mod eman;
mod even;
mod optimum;
mod random;
mod saff;

pub use eman::EmanGenerator;
pub use even::EvenGenerator;
pub use optimum::OptimumGenerator;
pub use random::RandomGenerator;
pub use saff::SaffGenerator;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cryoem_core::constants::TWOPI;
use cryoem_core::math::fmod;
use cryoem_core::{Params, Transform};

use crate::errors::{SymmetryError, SymmetryResult};
use crate::groups::SymmetryGroup;

/// Configuration shared by every orientation generator.
///
/// Exactly one of `delta` (angular step in degrees) and `n` (target
/// orientation count) must be set; validation happens when the generator is
/// constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationSpec {
    pub delta: Option<f64>,
    pub n: Option<i32>,
    pub inc_mirror: bool,
    pub random_phi: bool,
    pub phitoo: f64,
    pub perturb: bool,
    pub seed: Option<u64>,
}

impl OrientationSpec {
    /// A spec with the given angular step in degrees.
    pub fn with_delta(delta: f64) -> Self {
        Self {
            delta: Some(delta),
            n: None,
            inc_mirror: false,
            random_phi: false,
            phitoo: 0.0,
            perturb: false,
            seed: None,
        }
    }

    /// A spec targeting `n` orientations via bisection on the step size.
    pub fn with_n(n: i32) -> Self {
        Self {
            delta: None,
            n: Some(n),
            inc_mirror: false,
            random_phi: false,
            phitoo: 0.0,
            perturb: false,
            seed: None,
        }
    }

    pub fn inc_mirror(mut self, inc_mirror: bool) -> Self {
        self.inc_mirror = inc_mirror;
        self
    }

    pub fn random_phi(mut self, random_phi: bool) -> Self {
        self.random_phi = random_phi;
        self
    }

    pub fn phitoo(mut self, phitoo: f64) -> Self {
        self.phitoo = phitoo;
        self
    }

    pub fn perturb(mut self, perturb: bool) -> Self {
        self.perturb = perturb;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn from_params(params: &Params) -> SymmetryResult<Self> {
        let delta = params.get_float_or("delta", 0.0).map_err(SymmetryError::from)?;
        let n = params.get_int_or("n", 0).map_err(SymmetryError::from)?;
        let mut spec = Self {
            delta: (delta > 0.0).then_some(delta),
            n: (n > 0).then_some(n as i32),
            inc_mirror: params.get_bool_or("inc_mirror", false)?,
            random_phi: params.get_bool_or("random_phi", false)?,
            phitoo: params.get_float_or("phitoo", 0.0)?,
            perturb: params.get_bool_or("perturb", false)?,
            seed: None,
        };
        if params.contains("seed") {
            spec.seed = Some(params.get_int_or("seed", 0)? as u64);
        }
        Ok(spec)
    }

    /// Checks the delta/n exclusivity and the phi policy.
    pub(crate) fn validate(&self, context: &str) -> SymmetryResult<()> {
        match (self.delta, self.n) {
            (Some(_), Some(_)) => Err(SymmetryError::invalid_parameter(
                context,
                "delta and n are mutually exclusive",
            )),
            (None, None) => Err(SymmetryError::invalid_parameter(
                context,
                "a positive delta or n is required",
            )),
            (Some(d), None) if d <= 0.0 => Err(SymmetryError::invalid_parameter(
                context,
                format!("delta must be positive, got {}", d),
            )),
            (None, Some(n)) if n <= 0 => Err(SymmetryError::invalid_parameter(
                context,
                format!("n must be positive, got {}", n),
            )),
            _ => {
                if self.phitoo < 0.0 {
                    return Err(SymmetryError::invalid_parameter(
                        context,
                        format!("phitoo must be non-negative, got {}", self.phitoo),
                    ));
                }
                Ok(())
            }
        }
    }

    pub(crate) fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Appends the orientation `(az, alt)` with the configured phi policy:
/// a uniform random third Euler when `random_phi`, plus the `phitoo` ring of
/// duplicates at `phi + p, phi + 2p, ...`.
pub(crate) fn add_orientation(
    out: &mut Vec<Transform>,
    az: f64,
    alt: f64,
    rng: &mut StdRng,
    spec: &OrientationSpec,
) {
    let phi = if spec.random_phi {
        rng.random_range(0.0..360.0)
    } else {
        0.0
    };
    out.push(Transform::from_eman(az, alt, phi));
    if spec.phitoo > 0.0 {
        let mut p = spec.phitoo;
        while p <= 360.0 - spec.phitoo {
            out.push(Transform::from_eman(az, alt, fmod(phi + p, 360.0)));
            p += spec.phitoo;
        }
    }
}

/// A Gaussian draw with the given sigma (Box-Muller on two uniforms).
pub(crate) fn gauss(rng: &mut StdRng, sigma: f64) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random_range(0.0..1.0);
    sigma * libm::sqrt(-2.0 * libm::log(u1)) * libm::cos(TWOPI * u2)
}

/// Converts a target count into an angular step by bisecting on `delta`.
///
/// The tally callback must count with exactly the loop the generator will
/// later run. The search starts from the widest sensible step,
/// `360 / max_csym`, and stops when the count matches or the bracket closes
/// below 1e-4 degrees (the requested count is then infeasible and the
/// midpoint is the nearest achievable step).
pub(crate) fn optimal_delta(
    sym: &SymmetryGroup,
    n: i32,
    mut tally: impl FnMut(&SymmetryGroup, f64) -> usize,
) -> f64 {
    let mut delta_soln = 360.0 / sym.get_max_csym() as f64;
    let mut upper = delta_soln;
    let mut lower = 0.0;

    loop {
        let count = tally(sym, delta_soln) as i32;
        if count == n {
            return delta_soln;
        }
        if upper - lower < 1.0e-4 {
            return (upper + lower) / 2.0;
        }
        if count < n {
            upper = delta_soln;
            delta_soln -= (delta_soln - lower) / 2.0;
        } else {
            lower = delta_soln;
            delta_soln += (upper - delta_soln) / 2.0;
        }
    }
}

/// An orientation generator: one of the five tiling strategies.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrientationGenerator {
    Eman(EmanGenerator),
    Even(EvenGenerator),
    Saff(SaffGenerator),
    Random(RandomGenerator),
    Optimum(OptimumGenerator),
}

impl OrientationGenerator {
    pub fn eman(spec: OrientationSpec) -> Self {
        Self::Eman(EmanGenerator::new(spec))
    }

    pub fn even(spec: OrientationSpec) -> Self {
        Self::Even(EvenGenerator::new(spec))
    }

    pub fn saff(spec: OrientationSpec) -> Self {
        Self::Saff(SaffGenerator::new(spec))
    }

    /// Builds a generator by name: one of `eman`, `even`, `saff`, `rand`,
    /// `opt`.
    pub fn from_spec(name: &str, spec: OrientationSpec) -> SymmetryResult<Self> {
        let generator = match name.to_ascii_lowercase().as_str() {
            "eman" => Self::Eman(EmanGenerator::new(spec)),
            "even" => Self::Even(EvenGenerator::new(spec)),
            "saff" => Self::Saff(SaffGenerator::new(spec)),
            "rand" => Self::Random(RandomGenerator::new(spec)?),
            "opt" => Self::Optimum(OptimumGenerator::new(spec, OptimumGenerator::DEFAULT_INNER)?),
            _ => {
                return Err(SymmetryError::invalid_parameter(
                    "orientation generator",
                    format!("unknown generator {:?}", name),
                ))
            }
        };
        generator.spec().validate(name)?;
        Ok(generator)
    }

    /// Parses a generator name plus its parameter map.
    ///
    /// Recognized parameters: `delta` (float, degrees), `n` (int),
    /// `inc_mirror`, `random_phi`, `perturb` (bool), `phitoo` (float,
    /// degrees), `seed` (int), and for `opt` the inner generator name `use`.
    pub fn parse(name: &str, params: &Params) -> SymmetryResult<Self> {
        let spec = OrientationSpec::from_params(params)?;
        if name.eq_ignore_ascii_case("opt") {
            let inner = params.get_str_or("use", OptimumGenerator::DEFAULT_INNER)?;
            let generator = Self::Optimum(OptimumGenerator::new(spec, inner)?);
            generator.spec().validate(name)?;
            return Ok(generator);
        }
        Self::from_spec(name, spec)
    }

    /// The configuration this generator was built with.
    pub fn spec(&self) -> &OrientationSpec {
        match self {
            Self::Eman(g) => g.spec(),
            Self::Even(g) => g.spec(),
            Self::Saff(g) => g.spec(),
            Self::Random(g) => g.spec(),
            Self::Optimum(g) => g.spec(),
        }
    }

    /// Produces the orientations tiling one asymmetric unit of `sym`.
    pub fn generate(&self, sym: &SymmetryGroup) -> SymmetryResult<Vec<Transform>> {
        match self {
            Self::Eman(g) => g.generate(sym),
            Self::Even(g) => g.generate(sym),
            Self::Saff(g) => g.generate(sym),
            Self::Random(g) => g.generate(sym),
            Self::Optimum(g) => g.generate(sym),
        }
    }

    /// Counts the orientations `generate` would emit at the given step,
    /// before any phi-policy duplication.
    ///
    /// The random generator has no step-driven tally and reports an error.
    pub fn tally(&self, sym: &SymmetryGroup, delta: f64) -> SymmetryResult<usize> {
        match self {
            Self::Eman(g) => Ok(g.tally(sym, delta)),
            Self::Even(g) => Ok(g.tally(sym, delta)),
            Self::Saff(g) => Ok(g.tally(sym, delta)),
            Self::Random(_) => Err(SymmetryError::invalid_parameter(
                "rand",
                "the random generator is driven by n, not delta",
            )),
            Self::Optimum(g) => g.tally(sym, delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_validation() {
        assert!(OrientationSpec::with_delta(7.5).validate("eman").is_ok());
        assert!(OrientationSpec::with_n(100).validate("eman").is_ok());

        let both = OrientationSpec {
            delta: Some(5.0),
            n: Some(10),
            ..OrientationSpec::with_delta(5.0)
        };
        assert!(both.validate("eman").is_err());

        let neither = OrientationSpec {
            delta: None,
            n: None,
            ..OrientationSpec::with_delta(5.0)
        };
        assert!(neither.validate("eman").is_err());

        let negative_phitoo = OrientationSpec::with_delta(5.0).phitoo(-1.0);
        assert!(negative_phitoo.validate("eman").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_name() {
        let mut params = Params::new();
        params.set("delta", 10.0);
        assert!(OrientationGenerator::parse("spiral", &params).is_err());
    }

    #[test]
    fn test_parse_known_names() {
        let mut params = Params::new();
        params.set("delta", 10.0);
        for name in ["eman", "even", "saff", "opt"] {
            assert!(OrientationGenerator::parse(name, &params).is_ok(), "{}", name);
        }
        let mut params = Params::new();
        params.set("n", 50);
        assert!(OrientationGenerator::parse("rand", &params).is_ok());
    }

    #[test]
    fn test_phitoo_multiplies_orientations() {
        let mut out = Vec::new();
        let spec = OrientationSpec::with_delta(10.0).phitoo(90.0);
        let mut rng = spec.make_rng();
        add_orientation(&mut out, 0.0, 45.0, &mut rng, &spec);
        // phi = 0, 90, 180, 270
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_gauss_is_centered() {
        let spec = OrientationSpec::with_delta(10.0).seed(17);
        let mut rng = spec.make_rng();
        let mean: f64 = (0..2000).map(|_| gauss(&mut rng, 2.0)).sum::<f64>() / 2000.0;
        assert!(mean.abs() < 0.2, "mean {}", mean);
    }
}

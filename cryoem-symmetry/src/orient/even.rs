//! Latitude-banded tiling with plain equispaced azimuths.

use cryoem_core::constants::DEG_TO_RAD;
use cryoem_core::Transform;

use crate::errors::SymmetryResult;
use crate::groups::SymmetryGroup;
use crate::orient::{add_orientation, optimal_delta, OrientationSpec};

/// The simpler sibling of the `eman` strategy: at each latitude the azimuth
/// count is `max(1, floor(az_max / (delta / sin(alt))) - 1)` equispaced
/// points, with a single point at the poles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvenGenerator {
    spec: OrientationSpec,
}

impl EvenGenerator {
    pub fn new(spec: OrientationSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &OrientationSpec {
        &self.spec
    }

    fn scan(&self, sym: &SymmetryGroup, delta: f64, mut emit: impl FnMut(f64, f64, f64)) {
        let inc_mirror = self.spec.inc_mirror;
        let delimiters = sym.get_delimiters(inc_mirror);
        let alt_max = delimiters.alt_max;
        let az_max = delimiters.az_max;
        let alt_min = if sym.is_h_sym() { delimiters.alt_min } else { 0.0 };

        let mut alt = alt_min;
        while alt <= alt_max {
            let (steps, detaz) = if alt == 0.0 || alt == 180.0 {
                (1, 360.0)
            } else {
                let detaz = delta / libm::sin(alt * DEG_TO_RAD);
                let mut steps = (az_max / detaz) as i64 - 1;
                if steps < 1 {
                    steps = 1;
                }
                (steps, az_max / steps as f64)
            };
            for i in 0..steps {
                let az = i as f64 * detaz;
                if sym.is_platonic_sym() && !sym.is_in_asym_unit(alt, az, inc_mirror) {
                    continue;
                }
                emit(az, alt, detaz);
            }
            alt += delta;
        }
    }

    /// Counts the orientations emitted at the given step.
    pub fn tally(&self, sym: &SymmetryGroup, delta: f64) -> usize {
        let delimiters = sym.get_delimiters(self.spec.inc_mirror);
        let mirror_h = sym.is_h_sym() && self.spec.inc_mirror;
        let alt_min = if sym.is_h_sym() { delimiters.alt_min } else { 0.0 };
        let mut count = 0;
        self.scan(sym, delta, |_az, alt, _h| {
            count += 1;
            if mirror_h && alt != alt_min {
                count += 1;
            }
        });
        count
    }

    pub fn generate(&self, sym: &SymmetryGroup) -> SymmetryResult<Vec<Transform>> {
        self.spec.validate("even")?;
        let delta = match self.spec.delta {
            Some(delta) => delta,
            None => {
                let n = self.spec.n.unwrap();
                optimal_delta(sym, n, |sym, delta| self.tally(sym, delta))
            }
        };

        let delimiters = sym.get_delimiters(self.spec.inc_mirror);
        let mirror_h = sym.is_h_sym() && self.spec.inc_mirror;
        let alt_min = if sym.is_h_sym() { delimiters.alt_min } else { 0.0 };
        let mut rng = self.spec.make_rng();
        let mut ret = Vec::new();

        self.scan(sym, delta, |az, alt, _h| {
            add_orientation(&mut ret, az, alt, &mut rng, &self.spec);
            if mirror_h && alt != alt_min {
                add_orientation(&mut ret, az, 2.0 * alt_min - alt, &mut rng, &self.spec);
            }
        });

        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_at_pole() {
        let sym = SymmetryGroup::parse("c1").unwrap();
        let generator = EvenGenerator::new(OrientationSpec::with_delta(30.0));
        let views = generator.generate(&sym).unwrap();
        let polar: Vec<_> = views
            .iter()
            .filter(|t| {
                let (_az, alt, _phi) = t.eman_angles();
                alt == 0.0
            })
            .collect();
        assert_eq!(polar.len(), 1);
    }

    #[test]
    fn test_tally_matches_generate() {
        for name in ["c1", "c3", "d4", "icos", "h2"] {
            let sym = SymmetryGroup::parse(name).unwrap();
            for inc_mirror in [false, true] {
                let generator =
                    EvenGenerator::new(OrientationSpec::with_delta(9.0).inc_mirror(inc_mirror));
                assert_eq!(
                    generator.tally(&sym, 9.0),
                    generator.generate(&sym).unwrap().len(),
                    "{} mirror {}",
                    name,
                    inc_mirror
                );
            }
        }
    }

    #[test]
    fn test_azimuths_equispaced() {
        let sym = SymmetryGroup::parse("c1").unwrap();
        let generator = EvenGenerator::new(OrientationSpec::with_delta(30.0));
        let views = generator.generate(&sym).unwrap();
        // Pick the equator band and check consecutive azimuth gaps agree.
        let mut equator: Vec<f64> = views
            .iter()
            .filter_map(|t| {
                let (az, alt, _phi) = t.eman_angles();
                ((alt - 90.0).abs() < 1e-9).then_some(cryoem_core::angle::wrap_0_360(az))
            })
            .collect();
        equator.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!(equator.len() > 2);
        let gap = equator[1] - equator[0];
        for w in equator.windows(2) {
            assert!((w[1] - w[0] - gap).abs() < 1e-6);
        }
    }

    #[test]
    fn test_all_altitudes_in_range() {
        let sym = SymmetryGroup::parse("d2").unwrap();
        let generator = EvenGenerator::new(OrientationSpec::with_delta(12.0));
        for t in generator.generate(&sym).unwrap() {
            let (_az, alt, _phi) = t.eman_angles();
            assert!((0.0..=90.0).contains(&alt));
        }
    }
}

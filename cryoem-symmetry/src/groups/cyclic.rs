//! Cyclic symmetry C_n: n-fold rotation about the z axis.

use cryoem_core::constants::DEG_TO_RAD;
use cryoem_core::{Transform, Vec3};

use crate::errors::{SymmetryError, SymmetryResult};
use crate::groups::{Delimiters, PointGroup};

/// The cyclic group C_n. `c1` is the trivial group of a particle with no
/// symmetry at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CyclicSym {
    nsym: i32,
}

impl CyclicSym {
    pub fn new(nsym: i32) -> SymmetryResult<Self> {
        if nsym <= 0 {
            return Err(SymmetryError::invalid_parameter(
                "cyclic symmetry",
                format!("nsym must be positive, got {}", nsym),
            ));
        }
        Ok(Self { nsym })
    }

    pub fn nsym(&self) -> i32 {
        self.nsym
    }
}

impl PointGroup for CyclicSym {
    fn order(&self) -> i32 {
        self.nsym
    }

    fn get_sym(&self, k: i32) -> Transform {
        let k = k.rem_euclid(self.nsym);
        Transform::from_eman(k as f64 * 360.0 / self.nsym as f64, 0.0, 0.0)
    }

    fn get_delimiters(&self, inc_mirror: bool) -> Delimiters {
        Delimiters {
            alt_min: 0.0,
            alt_max: if inc_mirror { 180.0 } else { 90.0 },
            az_max: 360.0 / self.nsym as f64,
        }
    }

    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        let d = self.get_delimiters(inc_mirror);
        if self.nsym != 1 && az < 0.0 {
            return false;
        }
        alt <= d.alt_max && az <= d.az_max
    }

    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        let d = self.get_delimiters(inc_mirror);
        if self.nsym == 1 {
            if inc_mirror {
                // The whole sphere; no bounding polygon exists.
                return Vec::new();
            }
            return vec![
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
            ];
        }
        if self.nsym == 2 && !inc_mirror {
            return vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ];
        }

        let mut points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, -1.0, 0.0)];
        if inc_mirror {
            points.push(Vec3::new(0.0, 0.0, -1.0));
        }
        let angle = d.az_max * DEG_TO_RAD;
        points.push(Vec3::new(libm::sin(angle), -libm::cos(angle), 0.0));
        points
    }

    fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]> {
        let v = self.get_asym_unit_points(inc_mirror);
        if v.is_empty() {
            // nsym == 1 with mirror: the whole sphere.
            return Vec::new();
        }
        if self.nsym == 1 && !inc_mirror {
            let z = Vec3::z_axis();
            return vec![
                [z, v[1], v[0]],
                [z, v[2], v[1]],
                [z, v[3], v[2]],
                [z, v[0], v[3]],
            ];
        }
        if self.nsym == 2 && inc_mirror {
            let x = Vec3::x_axis();
            return vec![
                [v[1], v[0], x],
                [v[2], v[1], x],
                [v[3], v[2], x],
                [v[0], v[3], x],
            ];
        }
        if self.nsym == 2 && !inc_mirror {
            return vec![[v[0], v[2], v[1]], [v[2], v[0], v[3]]];
        }
        if v.len() == 3 {
            return vec![[v[0], v[2], v[1]]];
        }
        vec![[v[0], v[3], v[1]], [v[1], v[3], v[2]]]
    }

    fn get_max_csym(&self) -> i32 {
        self.nsym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nonpositive_nsym() {
        assert!(CyclicSym::new(0).is_err());
        assert!(CyclicSym::new(-3).is_err());
    }

    #[test]
    fn test_elements_wrap() {
        let c4 = CyclicSym::new(4).unwrap();
        // get_sym(order) is get_sym(0).
        assert!(c4.get_sym(4).max_difference(&c4.get_sym(0)) < 1e-12);
        assert!(c4.get_sym(0).is_identity());
    }

    #[test]
    fn test_c4_quarter_turn() {
        let c4 = CyclicSym::new(4).unwrap();
        let (az, alt, phi) = c4.get_sym(1).eman_angles();
        assert!((az - 90.0).abs() < 1e-9);
        assert!(alt.abs() < 1e-9);
        assert!(phi.abs() < 1e-9);
    }

    #[test]
    fn test_delimiters() {
        let c3 = CyclicSym::new(3).unwrap();
        let d = c3.get_delimiters(false);
        assert_eq!(d.alt_max, 90.0);
        assert!((d.az_max - 120.0).abs() < 1e-12);
        assert_eq!(c3.get_delimiters(true).alt_max, 180.0);
    }

    #[test]
    fn test_membership_box() {
        let c4 = CyclicSym::new(4).unwrap();
        assert!(c4.is_in_asym_unit(30.0, 45.0, false));
        assert!(!c4.is_in_asym_unit(30.0, 91.0, false));
        assert!(!c4.is_in_asym_unit(120.0, 45.0, false));
        assert!(c4.is_in_asym_unit(120.0, 45.0, true));
        assert!(!c4.is_in_asym_unit(30.0, -1.0, false));
    }

    #[test]
    fn test_c1_mirror_covers_sphere() {
        let c1 = CyclicSym::new(1).unwrap();
        assert!(c1.is_in_asym_unit(175.0, 359.0, true));
        assert!(c1.get_asym_unit_points(true).is_empty());
        assert!(c1.get_asym_unit_triangles(true).is_empty());
    }

    #[test]
    fn test_triangle_counts() {
        let c1 = CyclicSym::new(1).unwrap();
        assert_eq!(c1.get_asym_unit_triangles(false).len(), 4);
        let c2 = CyclicSym::new(2).unwrap();
        assert_eq!(c2.get_asym_unit_triangles(false).len(), 2);
        assert_eq!(c2.get_asym_unit_triangles(true).len(), 4);
        let c5 = CyclicSym::new(5).unwrap();
        assert_eq!(c5.get_asym_unit_triangles(false).len(), 1);
        assert_eq!(c5.get_asym_unit_triangles(true).len(), 2);
    }
}

//! Dihedral symmetry D_n: n-fold rotation about z plus a 2-fold flip.

use cryoem_core::constants::DEG_TO_RAD;
use cryoem_core::{Transform, Vec3};

use crate::errors::{SymmetryError, SymmetryResult};
use crate::groups::{Delimiters, PointGroup};

/// The dihedral group D_n, order 2n.
///
/// Elements 0..n are the z-rotations; elements n..2n are the same rotations
/// followed by a 180-degree flip about x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DihedralSym {
    nsym: i32,
}

impl DihedralSym {
    pub fn new(nsym: i32) -> SymmetryResult<Self> {
        if nsym <= 0 {
            return Err(SymmetryError::invalid_parameter(
                "dihedral symmetry",
                format!("nsym must be positive, got {}", nsym),
            ));
        }
        Ok(Self { nsym })
    }

    pub fn nsym(&self) -> i32 {
        self.nsym
    }
}

impl PointGroup for DihedralSym {
    fn order(&self) -> i32 {
        2 * self.nsym
    }

    fn get_sym(&self, k: i32) -> Transform {
        let order = 2 * self.nsym;
        let k = k.rem_euclid(order);
        if k >= self.nsym {
            Transform::from_eman(
                (k - self.nsym) as f64 * 360.0 / self.nsym as f64,
                180.0,
                0.0,
            )
        } else {
            Transform::from_eman(k as f64 * 360.0 / self.nsym as f64, 0.0, 0.0)
        }
    }

    fn get_delimiters(&self, inc_mirror: bool) -> Delimiters {
        Delimiters {
            alt_min: 0.0,
            alt_max: 90.0,
            az_max: if inc_mirror {
                360.0 / self.nsym as f64
            } else {
                180.0 / self.nsym as f64
            },
        }
    }

    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        let d = self.get_delimiters(inc_mirror);
        if self.nsym == 1 && inc_mirror {
            alt >= 0.0 && alt <= d.alt_max && az <= d.az_max
        } else {
            alt >= 0.0 && alt <= d.alt_max && az >= 0.0 && az <= d.az_max
        }
    }

    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        let d = self.get_delimiters(inc_mirror);
        if self.nsym == 1 {
            if inc_mirror {
                return vec![
                    Vec3::new(0.0, -1.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(-1.0, 0.0, 0.0),
                ];
            }
            return vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ];
        }
        if self.nsym == 2 && inc_mirror {
            return vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ];
        }

        let angle = d.az_max * DEG_TO_RAD;
        vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(libm::sin(angle), -libm::cos(angle), 0.0),
        ]
    }

    fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]> {
        let v = self.get_asym_unit_points(inc_mirror);
        if (self.nsym == 1 && !inc_mirror) || (self.nsym == 2 && inc_mirror) {
            return vec![[v[0], v[2], v[1]], [v[2], v[0], v[3]]];
        }
        if self.nsym == 1 {
            let z = Vec3::z_axis();
            return vec![
                [z, v[1], v[0]],
                [z, v[2], v[1]],
                [z, v[3], v[2]],
                [z, v[0], v[3]],
            ];
        }
        vec![[v[0], v[2], v[1]]]
    }

    fn get_max_csym(&self) -> i32 {
        self.nsym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_2n() {
        assert_eq!(DihedralSym::new(3).unwrap().order(), 6);
        assert_eq!(DihedralSym::new(7).unwrap().order(), 14);
    }

    #[test]
    fn test_flip_elements() {
        let d3 = DihedralSym::new(3).unwrap();
        // Element 3 is the bare flip.
        let (az, alt, _phi) = d3.get_sym(3).eman_angles();
        assert!(az.abs() < 1e-9);
        assert!((alt - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_elements_wrap() {
        let d3 = DihedralSym::new(3).unwrap();
        assert!(d3.get_sym(6).max_difference(&d3.get_sym(0)) < 1e-12);
    }

    #[test]
    fn test_delimiters_halved_without_mirror() {
        let d4 = DihedralSym::new(4).unwrap();
        assert!((d4.get_delimiters(false).az_max - 45.0).abs() < 1e-12);
        assert!((d4.get_delimiters(true).az_max - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_membership() {
        let d2 = DihedralSym::new(2).unwrap();
        assert!(d2.is_in_asym_unit(45.0, 60.0, false));
        assert!(!d2.is_in_asym_unit(45.0, 100.0, false));
        assert!(!d2.is_in_asym_unit(100.0, 45.0, true));
    }

    #[test]
    fn test_triangle_counts() {
        let d1 = DihedralSym::new(1).unwrap();
        assert_eq!(d1.get_asym_unit_triangles(false).len(), 2);
        assert_eq!(d1.get_asym_unit_triangles(true).len(), 4);
        let d5 = DihedralSym::new(5).unwrap();
        assert_eq!(d5.get_asym_unit_triangles(false).len(), 1);
    }
}

//! Platonic symmetries T, O, I: the rotation groups of the tetrahedron,
//! octahedron (cube), and icosahedron (dodecahedron).
//!
//! Each group is stored as a precomputed table of Euler triples with the
//! principal face pointing along +z. The asymmetric unit is the spherical
//! triangle described by Baldwin & Penczek: with `capSigma = 2 pi / m` for
//! principal symmetry `m` and `alpha = acos(1 / (sqrt(3) tan(Sigma/2)))`,
//! the unit spans azimuth `[0, Sigma]` and is bounded below by the arc
//!
//! ```text
//! B(az) = atan(1 / ((sin(Sigma/2 - az)/tan(theta_c/2) + sin(az)/tan(alpha)) / sin(Sigma/2)))
//! ```
//!
//! where `theta_c/2 = acos(cos Sigma / (1 - cos Sigma)) / 2`. A direction is
//! inside the unit when its altitude stays above the arc (closer to the
//! pole). For T the unit additionally splits along `B(az, alpha/2)` into the
//! two mirror halves.

use cryoem_core::constants::{DEG_TO_RAD, ICOS_FACE_ALT_DEG, RAD_TO_DEG, TET_FACE_ALT_DEG, TWOPI};
use cryoem_core::{Transform, Vec3};

use crate::groups::{fan_triangles, Delimiters, PointGroup};

/// Baldwin-Penczek angles shared by the three platonic families, in radians.
struct PlatonicParams {
    cap_sig: f64,
    alpha: f64,
    theta_c_on_two: f64,
}

fn platonic_params(max_csym: i32) -> PlatonicParams {
    let cap_sig = TWOPI / max_csym as f64;
    let alpha = libm::acos(1.0 / (libm::sqrt(3.0) * libm::tan(cap_sig / 2.0)));
    let theta_c_on_two = 0.5 * libm::acos(libm::cos(cap_sig) / (1.0 - libm::cos(cap_sig)));
    PlatonicParams {
        cap_sig,
        alpha,
        theta_c_on_two,
    }
}

/// The lower-altitude bounding arc of the asymmetric unit, in radians.
///
/// `az` must already be folded into `[0, Sigma/2]`.
fn baldwin_lower_alt_bound(p: &PlatonicParams, az: f64, alpha: f64) -> f64 {
    let mut bound = libm::sin(p.cap_sig / 2.0 - az) / libm::tan(p.theta_c_on_two);
    bound += libm::sin(az) / libm::tan(alpha);
    bound /= libm::sin(p.cap_sig / 2.0);
    libm::atan(1.0 / bound)
}

fn platonic_delimiters(max_csym: i32, halve_az: bool) -> Delimiters {
    let p = platonic_params(max_csym);
    let az_max = if halve_az {
        0.5 * RAD_TO_DEG * p.cap_sig
    } else {
        RAD_TO_DEG * p.cap_sig
    };
    Delimiters {
        alt_min: 0.0,
        alt_max: RAD_TO_DEG * p.alpha,
        az_max,
    }
}

/// Membership test for the octahedral and icosahedral units, whose mirror
/// halves are separated by halving the azimuth range in the delimiters.
fn platonic_is_in_asym_unit(d: &Delimiters, p: &PlatonicParams, alt: f64, az: f64) -> bool {
    if alt < 0.0 || alt > d.alt_max || az < 0.0 || az > d.az_max {
        return false;
    }
    let mut az_rad = az * DEG_TO_RAD;
    if az_rad > p.cap_sig / 2.0 {
        az_rad = p.cap_sig - az_rad;
    }
    baldwin_lower_alt_bound(p, az_rad, p.alpha) > alt * DEG_TO_RAD
}

/// The asymmetric-unit polygon shared by the platonic families.
///
/// `with_face_center` adds the triangle's interior face-center vertex, which
/// for O and I is always present and for T only when the mirror is included.
fn platonic_asym_unit_points(
    p: &PlatonicParams,
    with_face_center: bool,
    with_mirror_vertex: bool,
    az_alignment_offset: f64,
) -> Vec<Vec3> {
    let theta_c = 2.0 * p.theta_c_on_two;
    let (sin_half, cos_half) = libm::sincos(p.theta_c_on_two);
    let (sin_c, cos_c) = libm::sincos(theta_c);
    let (sin_sig, cos_sig) = libm::sincos(p.cap_sig);

    let b = Vec3::z_axis();
    let c_on_two = Vec3::new(0.0, -sin_half, cos_half);
    let c = Vec3::new(0.0, -sin_c, cos_c);
    let a = Vec3::new(sin_c * sin_sig, -sin_c * cos_sig, cos_c);

    let mut points = vec![b, c_on_two];
    if with_face_center {
        points.push((a + b + c).normalize());
    }
    if with_mirror_vertex {
        points.push(Vec3::new(sin_half * sin_sig, -sin_half * cos_sig, cos_half));
    }

    if az_alignment_offset != 0.0 {
        let t = Transform::from_eman(0.0, 0.0, az_alignment_offset);
        for point in &mut points {
            *point = *point * &t;
        }
    }
    points
}

fn table_sym(table: &[[f64; 3]], k: i32) -> Transform {
    let idx = k.rem_euclid(table.len() as i32) as usize;
    let [az, alt, phi] = table[idx];
    Transform::from_eman(az, alt, phi)
}

// Element tables, principal face along +z.

const TET_TABLE: [[f64; 3]; 12] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 120.0],
    [0.0, 0.0, 240.0],
    [0.0, TET_FACE_ALT_DEG, 60.0],
    [0.0, TET_FACE_ALT_DEG, 180.0],
    [0.0, TET_FACE_ALT_DEG, 300.0],
    [120.0, TET_FACE_ALT_DEG, 60.0],
    [120.0, TET_FACE_ALT_DEG, 180.0],
    [120.0, TET_FACE_ALT_DEG, 300.0],
    [240.0, TET_FACE_ALT_DEG, 60.0],
    [240.0, TET_FACE_ALT_DEG, 180.0],
    [240.0, TET_FACE_ALT_DEG, 300.0],
];

const OCT_TABLE: [[f64; 3]; 24] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 90.0],
    [0.0, 0.0, 180.0],
    [0.0, 0.0, 270.0],
    [0.0, 90.0, 0.0],
    [0.0, 90.0, 90.0],
    [0.0, 90.0, 180.0],
    [0.0, 90.0, 270.0],
    [90.0, 90.0, 0.0],
    [90.0, 90.0, 90.0],
    [90.0, 90.0, 180.0],
    [90.0, 90.0, 270.0],
    [180.0, 90.0, 0.0],
    [180.0, 90.0, 90.0],
    [180.0, 90.0, 180.0],
    [180.0, 90.0, 270.0],
    [270.0, 90.0, 0.0],
    [270.0, 90.0, 90.0],
    [270.0, 90.0, 180.0],
    [270.0, 90.0, 270.0],
    [0.0, 180.0, 0.0],
    [0.0, 180.0, 90.0],
    [0.0, 180.0, 180.0],
    [0.0, 180.0, 270.0],
];

const ICOS_LVL2: f64 = 180.0 - ICOS_FACE_ALT_DEG;

const ICOS_TABLE: [[f64; 3]; 60] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 288.0],
    [0.0, 0.0, 216.0],
    [0.0, 0.0, 144.0],
    [0.0, 0.0, 72.0],
    [0.0, ICOS_FACE_ALT_DEG, 36.0],
    [0.0, ICOS_FACE_ALT_DEG, 324.0],
    [0.0, ICOS_FACE_ALT_DEG, 252.0],
    [0.0, ICOS_FACE_ALT_DEG, 180.0],
    [0.0, ICOS_FACE_ALT_DEG, 108.0],
    [72.0, ICOS_FACE_ALT_DEG, 36.0],
    [72.0, ICOS_FACE_ALT_DEG, 324.0],
    [72.0, ICOS_FACE_ALT_DEG, 252.0],
    [72.0, ICOS_FACE_ALT_DEG, 180.0],
    [72.0, ICOS_FACE_ALT_DEG, 108.0],
    [144.0, ICOS_FACE_ALT_DEG, 36.0],
    [144.0, ICOS_FACE_ALT_DEG, 324.0],
    [144.0, ICOS_FACE_ALT_DEG, 252.0],
    [144.0, ICOS_FACE_ALT_DEG, 180.0],
    [144.0, ICOS_FACE_ALT_DEG, 108.0],
    [216.0, ICOS_FACE_ALT_DEG, 36.0],
    [216.0, ICOS_FACE_ALT_DEG, 324.0],
    [216.0, ICOS_FACE_ALT_DEG, 252.0],
    [216.0, ICOS_FACE_ALT_DEG, 180.0],
    [216.0, ICOS_FACE_ALT_DEG, 108.0],
    [288.0, ICOS_FACE_ALT_DEG, 36.0],
    [288.0, ICOS_FACE_ALT_DEG, 324.0],
    [288.0, ICOS_FACE_ALT_DEG, 252.0],
    [288.0, ICOS_FACE_ALT_DEG, 180.0],
    [288.0, ICOS_FACE_ALT_DEG, 108.0],
    [36.0, ICOS_LVL2, 0.0],
    [36.0, ICOS_LVL2, 288.0],
    [36.0, ICOS_LVL2, 216.0],
    [36.0, ICOS_LVL2, 144.0],
    [36.0, ICOS_LVL2, 72.0],
    [108.0, ICOS_LVL2, 0.0],
    [108.0, ICOS_LVL2, 288.0],
    [108.0, ICOS_LVL2, 216.0],
    [108.0, ICOS_LVL2, 144.0],
    [108.0, ICOS_LVL2, 72.0],
    [180.0, ICOS_LVL2, 0.0],
    [180.0, ICOS_LVL2, 288.0],
    [180.0, ICOS_LVL2, 216.0],
    [180.0, ICOS_LVL2, 144.0],
    [180.0, ICOS_LVL2, 72.0],
    [252.0, ICOS_LVL2, 0.0],
    [252.0, ICOS_LVL2, 288.0],
    [252.0, ICOS_LVL2, 216.0],
    [252.0, ICOS_LVL2, 144.0],
    [252.0, ICOS_LVL2, 72.0],
    [324.0, ICOS_LVL2, 0.0],
    [324.0, ICOS_LVL2, 288.0],
    [324.0, ICOS_LVL2, 216.0],
    [324.0, ICOS_LVL2, 144.0],
    [324.0, ICOS_LVL2, 72.0],
    [0.0, 180.0, 0.0],
    [0.0, 180.0, 288.0],
    [0.0, 180.0, 216.0],
    [0.0, 180.0, 144.0],
    [0.0, 180.0, 72.0],
];

/// Tetrahedral symmetry, 12 elements, a face along +z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TetrahedralSym;

impl TetrahedralSym {
    pub fn new() -> Self {
        Self
    }
}

impl PointGroup for TetrahedralSym {
    fn order(&self) -> i32 {
        12
    }

    fn get_sym(&self, k: i32) -> Transform {
        table_sym(&TET_TABLE, k)
    }

    fn get_delimiters(&self, _inc_mirror: bool) -> Delimiters {
        // The tetrahedral unit keeps the full azimuth range; the mirror
        // split happens along the Baldwin arc instead.
        platonic_delimiters(self.get_max_csym(), false)
    }

    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        let d = self.get_delimiters(inc_mirror);
        if alt < 0.0 || alt > d.alt_max || az < 0.0 || az > d.az_max {
            return false;
        }
        let p = platonic_params(self.get_max_csym());
        let mut az_rad = az * DEG_TO_RAD;
        if az_rad > p.cap_sig / 2.0 {
            az_rad = p.cap_sig - az_rad;
        }
        let alt_rad = alt * DEG_TO_RAD;
        if baldwin_lower_alt_bound(&p, az_rad, p.alpha) <= alt_rad {
            return false;
        }
        if !inc_mirror {
            // The arc at alpha/2 separates the two mirror halves.
            baldwin_lower_alt_bound(&p, az_rad, p.alpha / 2.0) >= alt_rad
        } else {
            true
        }
    }

    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        let p = platonic_params(self.get_max_csym());
        platonic_asym_unit_points(&p, inc_mirror, true, self.get_az_alignment_offset())
    }

    fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]> {
        fan_triangles(&self.get_asym_unit_points(inc_mirror))
    }

    fn get_max_csym(&self) -> i32 {
        3
    }
}

/// Octahedral symmetry, 24 elements, a cube face along +z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctahedralSym;

impl OctahedralSym {
    pub fn new() -> Self {
        Self
    }
}

impl PointGroup for OctahedralSym {
    fn order(&self) -> i32 {
        24
    }

    fn get_sym(&self, k: i32) -> Transform {
        table_sym(&OCT_TABLE, k)
    }

    fn get_delimiters(&self, inc_mirror: bool) -> Delimiters {
        platonic_delimiters(self.get_max_csym(), !inc_mirror)
    }

    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        let d = self.get_delimiters(inc_mirror);
        let p = platonic_params(self.get_max_csym());
        platonic_is_in_asym_unit(&d, &p, alt, az)
    }

    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        let p = platonic_params(self.get_max_csym());
        platonic_asym_unit_points(&p, true, inc_mirror, self.get_az_alignment_offset())
    }

    fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]> {
        fan_triangles(&self.get_asym_unit_points(inc_mirror))
    }

    fn get_max_csym(&self) -> i32 {
        4
    }
}

/// Icosahedral symmetry, 60 elements, a pentagonal face along +z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IcosahedralSym;

impl IcosahedralSym {
    pub fn new() -> Self {
        Self
    }
}

impl PointGroup for IcosahedralSym {
    fn order(&self) -> i32 {
        60
    }

    fn get_sym(&self, k: i32) -> Transform {
        table_sym(&ICOS_TABLE, k)
    }

    fn get_delimiters(&self, inc_mirror: bool) -> Delimiters {
        platonic_delimiters(self.get_max_csym(), !inc_mirror)
    }

    fn is_in_asym_unit(&self, alt: f64, az: f64, inc_mirror: bool) -> bool {
        let d = self.get_delimiters(inc_mirror);
        let p = platonic_params(self.get_max_csym());
        platonic_is_in_asym_unit(&d, &p, alt, az)
    }

    fn get_asym_unit_points(&self, inc_mirror: bool) -> Vec<Vec3> {
        let p = platonic_params(self.get_max_csym());
        platonic_asym_unit_points(&p, true, inc_mirror, self.get_az_alignment_offset())
    }

    fn get_asym_unit_triangles(&self, inc_mirror: bool) -> Vec<[Vec3; 3]> {
        fan_triangles(&self.get_asym_unit_points(inc_mirror))
    }

    fn get_max_csym(&self) -> i32 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders() {
        assert_eq!(TetrahedralSym::new().order(), 12);
        assert_eq!(OctahedralSym::new().order(), 24);
        assert_eq!(IcosahedralSym::new().order(), 60);
    }

    #[test]
    fn test_first_element_is_identity() {
        assert!(TetrahedralSym::new().get_sym(0).is_identity());
        assert!(OctahedralSym::new().get_sym(0).is_identity());
        assert!(IcosahedralSym::new().get_sym(0).is_identity());
    }

    #[test]
    fn test_elements_are_rotations() {
        let icos = IcosahedralSym::new();
        for k in 0..60 {
            let t = icos.get_sym(k);
            assert!((t.determinant() - 1.0).abs() < 1e-9, "element {}", k);
            let product = &t * &t.transposed();
            assert!(
                product.max_difference(&Transform::identity()) < 1e-9,
                "element {} not orthogonal",
                k
            );
        }
    }

    #[test]
    fn test_icos_elements_distinct() {
        let icos = IcosahedralSym::new();
        let elements: Vec<Transform> = (0..60).map(|k| icos.get_sym(k)).collect();
        for i in 0..60 {
            for j in (i + 1)..60 {
                assert!(
                    elements[i].max_difference(&elements[j]) > 1e-4,
                    "elements {} and {} coincide",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_tet_second_band_altitude() {
        let tet = TetrahedralSym::new();
        let (_az, alt, _phi) = tet.get_sym(3).eman_angles();
        assert!((alt - TET_FACE_ALT_DEG).abs() < 1e-6);
        // acos(-1/3) in degrees
        assert!((TET_FACE_ALT_DEG - 109.4712).abs() < 1e-4);
    }

    #[test]
    fn test_pole_is_in_every_unit() {
        for (group, max_alt) in [
            (
                &TetrahedralSym::new() as &dyn PointGroup,
                TetrahedralSym::new().get_delimiters(false).alt_max,
            ),
            (
                &OctahedralSym::new() as &dyn PointGroup,
                OctahedralSym::new().get_delimiters(false).alt_max,
            ),
            (
                &IcosahedralSym::new() as &dyn PointGroup,
                IcosahedralSym::new().get_delimiters(false).alt_max,
            ),
        ] {
            assert!(group.is_in_asym_unit(0.0, 0.0, false));
            assert!(group.is_in_asym_unit(0.0, 0.0, true));
            assert!(!group.is_in_asym_unit(max_alt + 10.0, 0.0, true));
        }
    }

    #[test]
    fn test_icos_delimiters() {
        let icos = IcosahedralSym::new();
        let with_mirror = icos.get_delimiters(true);
        let without = icos.get_delimiters(false);
        assert!((with_mirror.az_max - 72.0).abs() < 1e-9);
        assert!((without.az_max - 36.0).abs() < 1e-9);
        // alpha = acos(1/(sqrt(3) tan(36 deg))) ~ 37.38 degrees
        assert!((with_mirror.alt_max - 37.377).abs() < 1e-2);
    }

    #[test]
    fn test_asym_unit_point_counts() {
        let oct = OctahedralSym::new();
        assert_eq!(oct.get_asym_unit_points(false).len(), 3);
        assert_eq!(oct.get_asym_unit_points(true).len(), 4);
        let tet = TetrahedralSym::new();
        assert_eq!(tet.get_asym_unit_points(false).len(), 3);
        assert_eq!(tet.get_asym_unit_points(true).len(), 4);
        assert_eq!(tet.get_asym_unit_triangles(true).len(), 2);
    }

    #[test]
    fn test_asym_unit_points_are_unit_length() {
        for group in [
            &TetrahedralSym::new() as &dyn PointGroup,
            &OctahedralSym::new(),
            &IcosahedralSym::new(),
        ] {
            for point in group.get_asym_unit_points(true) {
                assert!((point.magnitude() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_mirror_unit_contains_plain_unit() {
        let icos = IcosahedralSym::new();
        for alt_step in 0..20 {
            for az_step in 0..20 {
                let alt = alt_step as f64 * 2.0;
                let az = az_step as f64 * 2.0;
                if icos.is_in_asym_unit(alt, az, false) {
                    assert!(icos.is_in_asym_unit(alt, az, true), "({}, {})", alt, az);
                }
            }
        }
    }
}

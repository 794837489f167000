//! Reduction of rotations into a chosen asymmetric unit.
//!
//! Any rotation's pole lands somewhere on the sphere; exactly one group
//! element maps it back into the asymmetric unit. [`SymmetryGroup::reduce`]
//! finds that element by intersecting the pole ray with the unit's
//! triangulation under every group element, then rewrites the rotation as
//! its canonical coset representative.

use cryoem_core::constants::ERR_LIMIT;
use cryoem_core::{Transform, Vec3};

use crate::errors::{SymmetryError, SymmetryResult};
use crate::groups::SymmetryGroup;

/// Coefficients `(A, B, C, D)` of the plane `Ax + By + Cz + D = 0` through
/// three points.
fn equation_of_plane(v1: &Vec3, v2: &Vec3, v3: &Vec3) -> [f64; 4] {
    let a = v1.y * (v2.z - v3.z) + v2.y * (v3.z - v1.z) + v3.y * (v1.z - v2.z);
    let b = v1.z * (v2.x - v3.x) + v2.z * (v3.x - v1.x) + v3.z * (v1.x - v2.x);
    let c = v1.x * (v2.y - v3.y) + v2.x * (v3.y - v1.y) + v3.x * (v1.y - v2.y);
    let d = -(v1.x * (v2.y * v3.z - v3.y * v2.z)
        + v2.x * (v3.y * v1.z - v1.y * v3.z)
        + v3.x * (v1.y * v2.z - v2.y * v1.z));
    [a, b, c, d]
}

/// Whether the ray from the origin through `pole` pierces the triangle.
///
/// The barycentric coordinates are snapped to {0, 1} within the shared
/// tolerance so that poles sitting exactly on an edge or vertex are accepted
/// by the first triangle that reaches them.
fn ray_intersects_triangle(pole: &Vec3, triangle: &[Vec3; 3]) -> bool {
    let plane = equation_of_plane(&triangle[0], &triangle[2], &triangle[1]);

    let denom = plane[0] * pole.x + plane[1] * pole.y + plane[2] * pole.z;
    if denom == 0.0 {
        // Ray parallel to the plane.
        return false;
    }
    let scale = -plane[3] / denom;
    if scale <= 0.0 {
        // The triangle is behind the ray.
        return false;
    }
    let hit = *pole * scale;

    let v = triangle[2] - triangle[0];
    let u = triangle[1] - triangle[0];
    let w = hit - triangle[0];

    let uu = u.dot(&u);
    let uv = u.dot(&v);
    let uw = u.dot(&w);
    let vv = v.dot(&v);
    let vw = v.dot(&w);

    let d = 1.0 / (uv * uv - uu * vv);
    let mut s = (uv * vw - vv * uw) * d;
    let mut t = (uv * uw - uu * vw) * d;

    if s.abs() < ERR_LIMIT {
        s = 0.0;
    }
    if t.abs() < ERR_LIMIT {
        t = 0.0;
    }
    if (s.abs() - 1.0).abs() < ERR_LIMIT {
        s = 1.0;
    }
    if (t.abs() - 1.0).abs() < ERR_LIMIT {
        t = 1.0;
    }

    s >= 0.0 && t >= 0.0 && (s + t) <= 1.0
}

impl SymmetryGroup {
    /// Maps a rotation into the `k`-th asymmetric unit of this group.
    ///
    /// The pole of `t` is located inside the triangulated asymmetric unit of
    /// exactly one group element (ties on shared edges go to the lowest
    /// index); the result is `t * g_soln^T * g_k`, whose pole lies in the
    /// requested unit.
    ///
    /// Groups whose mirror-inclusive unit has no triangulation (C1, whose
    /// unit is the whole sphere, and helical strips) reduce trivially to
    /// `t * g_k`.
    ///
    /// # Errors
    ///
    /// [`SymmetryError::Numeric`] if no hosting triangle is found, which
    /// only happens on numerically degenerate input.
    pub fn reduce(&self, t: &Transform, k: i32) -> SymmetryResult<Transform> {
        let triangles = self.get_asym_unit_triangles(true);
        if triangles.is_empty() {
            return Ok(if k == 0 { *t } else { t * &self.get_sym(k) });
        }

        let pole = Vec3::z_axis() * t;

        let mut solution = None;
        'search: for i in 0..self.order() {
            let element = self.get_sym(i);
            for triangle in &triangles {
                let moved = if i == 0 {
                    *triangle
                } else {
                    [
                        triangle[0] * &element,
                        triangle[1] * &element,
                        triangle[2] * &element,
                    ]
                };
                if ray_intersects_triangle(&pole, &moved) {
                    solution = Some(i);
                    break 'search;
                }
            }
        }

        let soln = solution.ok_or_else(|| {
            SymmetryError::numeric("reduce", "no asymmetric unit hosts the pole")
        })?;

        let mut canonical = self.get_sym(soln);
        canonical.transpose();
        let mut reduced = t * &canonical;
        if k != 0 {
            reduced = &reduced * &self.get_sym(k);
        }
        Ok(reduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_through_triangle_vertices() {
        let a = Vec3::new(0.0, 0.0, 1.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let plane = equation_of_plane(&a, &b, &c);
        for v in [a, b, c] {
            let residual = plane[0] * v.x + plane[1] * v.y + plane[2] * v.z + plane[3];
            assert!(residual.abs() < 1e-12);
        }
    }

    #[test]
    fn test_ray_hits_containing_triangle() {
        let triangle = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let inside = Vec3::new(0.3, 0.3, 0.9).normalize();
        let outside = Vec3::new(-0.5, 0.3, 0.8).normalize();
        assert!(ray_intersects_triangle(&inside, &triangle));
        assert!(!ray_intersects_triangle(&outside, &triangle));
    }

    #[test]
    fn test_ray_behind_triangle_misses() {
        let triangle = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let behind = Vec3::new(-0.3, -0.3, -0.9).normalize();
        assert!(!ray_intersects_triangle(&behind, &triangle));
    }

    #[test]
    fn test_reduce_identity_stays_put() {
        let sym = SymmetryGroup::parse("c4").unwrap();
        let t = Transform::from_eman(20.0, 30.0, 0.0);
        let reduced = sym.reduce(&t, 0).unwrap();
        // Already inside the asymmetric unit: reduction picks element 0.
        assert!(reduced.max_difference(&t) < 1e-9);
    }

    #[test]
    fn test_reduce_brings_pole_home() {
        let sym = SymmetryGroup::parse("c4").unwrap();
        // az = 200 is deep inside another coset.
        let t = Transform::from_eman(200.0, 30.0, 0.0);
        let reduced = sym.reduce(&t, 0).unwrap();
        let (alt, az) = (Vec3::z_axis() * &reduced).to_alt_az();
        assert!(sym.is_in_asym_unit(alt, az, true), "({}, {})", alt, az);
    }

    #[test]
    fn test_reduce_into_requested_unit() {
        let sym = SymmetryGroup::parse("c4").unwrap();
        let t = Transform::from_eman(15.0, 40.0, 0.0);
        let reduced = sym.reduce(&t, 2).unwrap();
        let (alt, az) = (Vec3::z_axis() * &reduced).to_alt_az();
        // Unit 2 sits half a turn away.
        assert!((alt - 40.0).abs() < 1e-6);
        assert!((az - (15.0 + 180.0)).abs() < 1e-6);
    }

    #[test]
    fn test_reduce_trivial_for_c1() {
        let sym = SymmetryGroup::parse("c1").unwrap();
        let t = Transform::from_eman(123.0, 95.0, 45.0);
        let reduced = sym.reduce(&t, 0).unwrap();
        assert!(reduced.max_difference(&t) < 1e-15);
    }

    #[test]
    fn test_reduce_composite_preserves_rotation_class() {
        // Reduction multiplies by group elements only, so applying the found
        // element takes the reduced transform back to the original.
        let sym = SymmetryGroup::parse("d3").unwrap();
        let t = Transform::from_eman(250.0, 70.0, 10.0);
        let reduced = sym.reduce(&t, 0).unwrap();
        let mut matched = false;
        for i in 0..sym.order() {
            let back = &reduced * &sym.get_sym(i);
            if back.max_difference(&t) < 1e-6 {
                matched = true;
                break;
            }
        }
        assert!(matched);
    }
}

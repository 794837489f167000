//! 4x4 affine transforms for rigid-body particle alignment.
//!
//! A [`Transform`] bundles a rotation-and-scale block with a pre-translation
//! (applied before the rotation) and a post-translation (applied after). It
//! is the currency of projection matching: every particle orientation, every
//! symmetry-group element, and every generated projection direction is one of
//! these.
//!
//! # Storage Layout
//!
//! The matrix is stored row-major as `[[f64; 4]; 4]`. The 3x3 top-left block
//! is the rotation-and-scale matrix `R`. Two translations share the border:
//!
//! ```text
//! | R00 R01 R02 | t0 |      rows 0..2, col 3: total translation
//! | R10 R11 R12 | t1 |      (what [`transform`](Transform::transform) adds)
//! | R20 R21 R22 | t2 |
//! |  p0  p1  p2 |  1 |      row 3, cols 0..2: post-translation
//! ```
//!
//! The invariant tying them together is
//!
//! ```text
//! t_total = p_post + R * p_pre
//! ```
//!
//! so the pre-translation is recoverable as `R^-1 (t_total - p_post)`.
//! Setting the pre-translation keeps the post-translation fixed and updates
//! the total; setting the post-translation keeps the pre-translation fixed.
//!
//! # Composing Transforms
//!
//! Transforms compose by multiplication: `a * b` applies `b` first, then `a`.
//! The product carries `a`'s post-translation.
//!
//! ```
//! use cryoem_core::{Transform, Vec3};
//!
//! let a = Transform::from_eman(30.0, 0.0, 0.0);
//! let b = Transform::from_eman(60.0, 0.0, 0.0);
//! let c = &a * &b;
//!
//! // Two z-rotations add their angles.
//! let quarter = Transform::from_eman(90.0, 0.0, 0.0);
//! let v = Vec3::new(1.0, 2.0, 3.0);
//! let d = c.transform(&v) - quarter.transform(&v);
//! assert!(d.magnitude() < 1e-12);
//! ```
//!
//! # Inverting
//!
//! [`inverse`](Transform::inverse) computes the full affine inverse through
//! cofactor expansion of the 3x3 block; the translation column inverts as
//! `-R^-1 * t_total`. A singular block is reported as a numeric error rather
//! than producing NaNs.

use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use crate::constants::ERR_LIMIT;
use crate::errors::{GeomError, GeomResult};
use crate::matrix::Vec3;

/// A 4x4 affine transform: rotation-and-scale block plus pre/post translation.
///
/// Freshly constructed transforms are the identity. All mutation goes through
/// the setters and composition; angles at the API boundary are degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub(crate) matrix: [[f64; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates the identity transform.
    pub fn identity() -> Self {
        let mut matrix = [[0.0; 4]; 4];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { matrix }
    }

    /// Resets this transform to the identity.
    pub fn to_identity(&mut self) {
        *self = Self::identity();
    }

    /// Returns `true` if this transform is exactly the identity.
    pub fn is_identity(&self) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                if self.matrix[i][j] != expected {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the element at the specified row and column.
    ///
    /// Indices are 0-based. Panics if `row >= 4` or `col >= 4`. You can also
    /// use indexing syntax: `t[(row, col)]`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[row][col]
    }

    /// Sets the element at the specified row and column.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.matrix[row][col] = value;
    }

    /// Returns row `i` of the rotation block as a vector.
    pub fn rotation_row(&self, i: usize) -> Vec3 {
        Vec3::new(self.matrix[i][0], self.matrix[i][1], self.matrix[i][2])
    }

    /// Returns column `i` of the rotation block as a vector.
    pub fn rotation_col(&self, i: usize) -> Vec3 {
        Vec3::new(self.matrix[0][i], self.matrix[1][i], self.matrix[2][i])
    }

    /// Sets the pre-translation, keeping the post-translation fixed.
    ///
    /// Updates the total-translation column to `p_post + R * p_pre`.
    pub fn set_pretrans(&mut self, pre: Vec3) {
        let m = &mut self.matrix;
        for i in 0..3 {
            m[i][3] = m[3][i]
                + m[i][0] * pre.x
                + m[i][1] * pre.y
                + m[i][2] * pre.z;
        }
    }

    /// Sets the post-translation, keeping the pre-translation fixed.
    ///
    /// Updates the total-translation column to `p_post + R * p_pre`.
    pub fn set_posttrans(&mut self, post: Vec3) {
        let pre = self.get_pretrans();
        let m = &mut self.matrix;
        m[3][0] = post.x;
        m[3][1] = post.y;
        m[3][2] = post.z;
        for i in 0..3 {
            m[i][3] = m[3][i]
                + m[i][0] * pre.x
                + m[i][1] * pre.y
                + m[i][2] * pre.z;
        }
    }

    /// Returns the post-translation (row 3).
    pub fn get_posttrans(&self) -> Vec3 {
        Vec3::new(self.matrix[3][0], self.matrix[3][1], self.matrix[3][2])
    }

    /// Returns the total translation (column 3).
    pub fn get_total_trans(&self) -> Vec3 {
        Vec3::new(self.matrix[0][3], self.matrix[1][3], self.matrix[2][3])
    }

    /// Returns the pre-translation `R^-1 (t_total - p_post)`.
    ///
    /// A singular rotation block has no well-defined pre-translation; zero is
    /// reported in that case.
    pub fn get_pretrans(&self) -> Vec3 {
        let diff = self.get_total_trans() - self.get_posttrans();
        match self.inverse() {
            Ok(inv) => inv.rotate(&diff),
            Err(_) => Vec3::zeros(),
        }
    }

    /// Returns the uniform scale factor `sqrt(sum(R_ij^2) / 3)`.
    pub fn get_scale(&self) -> f64 {
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                sum += self.matrix[i][j] * self.matrix[i][j];
            }
        }
        libm::sqrt(sum / 3.0)
    }

    /// Multiplies the rotation block and the translation column by `scale`.
    ///
    /// The post-translation row is scaled as well, so the layout invariant is
    /// preserved.
    pub fn apply_scale(&mut self, scale: f64) {
        for i in 0..3 {
            for j in 0..4 {
                self.matrix[i][j] *= scale;
            }
        }
        for j in 0..3 {
            self.matrix[3][j] *= scale;
        }
    }

    /// Rescales the rotation block so that [`get_scale`](Self::get_scale)
    /// returns `scale`.
    ///
    /// Fails with a numeric error if `scale` is zero or the current block has
    /// zero scale.
    pub fn set_scale(&mut self, scale: f64) -> GeomResult<()> {
        if scale == 0.0 {
            return Err(GeomError::numeric("set_scale", "scale must be non-zero"));
        }
        let old = self.get_scale();
        if old == 0.0 {
            return Err(GeomError::numeric("set_scale", "current scale is zero"));
        }
        self.apply_scale(scale / old);
        Ok(())
    }

    /// Rescales the rotation block to scale 1, leaving a pure rotation.
    pub fn orthogonalize(&mut self) -> GeomResult<()> {
        self.set_scale(1.0)
    }

    /// Transposes the rotation block in place.
    ///
    /// For a pure rotation this is the inverse rotation; the translation
    /// entries are untouched.
    pub fn transpose(&mut self) {
        for i in 0..3 {
            for j in 0..i {
                let tmp = self.matrix[i][j];
                self.matrix[i][j] = self.matrix[j][i];
                self.matrix[j][i] = tmp;
            }
        }
    }

    /// Returns a copy with the rotation block transposed.
    pub fn transposed(&self) -> Self {
        let mut t = *self;
        t.transpose();
        t
    }

    /// Computes the determinant of the rotation block.
    pub fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the full affine inverse.
    ///
    /// The rotation block inverts through cofactor expansion; the translation
    /// column inverts as `-R^-1 * t_total`. The post-translation of the
    /// result is zero.
    ///
    /// # Errors
    ///
    /// [`GeomError::Numeric`] if the rotation block is singular.
    pub fn inverse(&self) -> GeomResult<Self> {
        let m = &self.matrix;
        let (m00, m01, m02) = (m[0][0], m[0][1], m[0][2]);
        let (m10, m11, m12) = (m[1][0], m[1][1], m[1][2]);
        let (m20, m21, m22) = (m[2][0], m[2][1], m[2][2]);
        let (v0, v1, v2) = (m[0][3], m[1][3], m[2][3]);

        let cof00 = m11 * m22 - m12 * m21;
        let cof11 = m22 * m00 - m20 * m02;
        let cof22 = m00 * m11 - m01 * m10;
        let cof01 = m10 * m22 - m20 * m12;
        let cof02 = m10 * m21 - m20 * m11;
        let cof12 = m00 * m21 - m01 * m20;
        let cof10 = m01 * m22 - m02 * m21;
        let cof20 = m01 * m12 - m02 * m11;
        let cof21 = m00 * m12 - m10 * m02;

        let det = m00 * cof00 + m02 * cof02 - m01 * cof01;
        if det.abs() < ERR_LIMIT * ERR_LIMIT * ERR_LIMIT {
            return Err(GeomError::numeric("inverse", "rotation block is singular"));
        }

        let mut inv = Self::identity();
        inv.matrix[0][0] = cof00 / det;
        inv.matrix[0][1] = -cof10 / det;
        inv.matrix[0][2] = cof20 / det;
        inv.matrix[1][0] = -cof01 / det;
        inv.matrix[1][1] = cof11 / det;
        inv.matrix[1][2] = -cof21 / det;
        inv.matrix[2][0] = cof02 / det;
        inv.matrix[2][1] = -cof12 / det;
        inv.matrix[2][2] = cof22 / det;

        inv.matrix[0][3] = (-cof00 * v0 + cof10 * v1 - cof20 * v2) / det;
        inv.matrix[1][3] = (cof01 * v0 - cof11 * v1 + cof21 * v2) / det;
        inv.matrix[2][3] = (-cof02 * v0 + cof12 * v1 - cof22 * v2) / det;

        Ok(inv)
    }

    /// Applies the full affine map: `R * v + t_total`.
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let m = &self.matrix;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3],
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3],
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3],
        )
    }

    /// Applies only the rotation block: `R * v`.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let m = &self.matrix;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Returns the maximum absolute difference between corresponding
    /// elements of the two matrices.
    pub fn max_difference(&self, other: &Self) -> f64 {
        let mut max_diff: f64 = 0.0;
        for i in 0..4 {
            for j in 0..4 {
                let diff = (self.matrix[i][j] - other.matrix[i][j]).abs();
                max_diff = max_diff.max(diff);
            }
        }
        max_diff
    }
}

fn multiply(a: &Transform, b: &Transform) -> Transform {
    let mut r = Transform::identity();
    for i in 0..3 {
        for j in 0..4 {
            r.matrix[i][j] = a.matrix[i][0] * b.matrix[0][j]
                + a.matrix[i][1] * b.matrix[1][j]
                + a.matrix[i][2] * b.matrix[2][j];
        }
        // a's own translation column rides along.
        r.matrix[i][3] += a.matrix[i][3];
    }
    // The product keeps a's post-translation.
    for j in 0..3 {
        r.matrix[3][j] = a.matrix[3][j];
    }
    r
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        multiply(&self, &rhs)
    }
}

impl Mul<&Transform> for Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        multiply(&self, rhs)
    }
}

impl Mul<Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        multiply(self, &rhs)
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        multiply(self, rhs)
    }
}

impl Mul<Vec3> for Transform {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(&v)
    }
}

impl Mul<Vec3> for &Transform {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(&v)
    }
}

/// Row-vector application `v * T`: multiplies through the rotation block
/// only, which is how pole directions move under a transform's transpose.
impl Mul<&Transform> for Vec3 {
    type Output = Vec3;

    fn mul(self, t: &Transform) -> Vec3 {
        let m = &t.matrix;
        Vec3::new(
            self.x * m[0][0] + self.y * m[1][0] + self.z * m[2][0],
            self.x * m[0][1] + self.y * m[1][1] + self.z * m[2][1],
            self.x * m[0][2] + self.y * m[1][2] + self.z * m[2][2],
        )
    }
}

impl Mul<Transform> for Vec3 {
    type Output = Vec3;

    fn mul(self, t: Transform) -> Vec3 {
        self * &t
    }
}

impl Index<(usize, usize)> for Transform {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.matrix[row][col]
    }
}

impl IndexMut<(usize, usize)> for Transform {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.matrix[row][col]
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transform:")?;
        for row in &self.matrix {
            writeln!(
                f,
                "  [{:12.9} {:12.9} {:12.9} {:12.9}]",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}

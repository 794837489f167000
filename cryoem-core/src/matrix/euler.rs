//! Rotation conventions: Euler-angle, quaternion, axis-angle, and direct
//! matrix forms.
//!
//! Cryo-EM packages never agreed on one Euler convention, so every rotation
//! here can be read and written in six of them, plus quaternion, axis-angle,
//! and raw-matrix forms. The internal representation is always the 3x3 block
//! of the [`Transform`]; conversions route through the EMAN `(az, alt, phi)`
//! triple.
//!
//! # The EMAN convention
//!
//! A rotation is the product of three clockwise frame rotations,
//! `Rz(phi) * Rx(alt) * Rz(az)`, all in degrees:
//!
//! ```text
//! | cos phi   sin phi   0 |   | 1     0        0    |   | cos az   sin az   0 |
//! |-sin phi   cos phi   0 | * | 0   cos alt  sin alt| * |-sin az   cos az   0 |
//! |    0         0      1 |   | 0  -sin alt  cos alt|   |    0        0     1 |
//! ```
//!
//! # Convention cross-walk
//!
//! | Convention | Angles | Relation to EMAN |
//! |------------|--------|------------------|
//! | EMAN | az, alt, phi | identity |
//! | IMAGIC | alpha, beta, gamma | alias |
//! | SPIDER | phi, theta, psi | az = phi + 90, phi = psi - 90 |
//! | MRC | phi, theta, omega | az = phi + 90, phi = 90 - omega |
//! | XYZ | xtilt, ytilt, ztilt | three sequential axis tilts |
//! | QUATERNION | e0..e3 | unit quaternion, clockwise convention |
//! | SPIN / SGIROT | Omega, n1..n3 | e0 = cos(Omega/2), e = sin(Omega/2) n |
//! | MATRIX | m11..m33 | direct entries |
//!
//! The MRC `omega` carries the negated sign throughout: the setter maps
//! `phi_EMAN = 90 - omega` and the getter reports `omega = 90 - phi_EMAN`
//! (wrapped into [0, 360)), so the pair round-trips.
//!
//! # Gimbal poles
//!
//! At `alt = 0` or `alt = 180` only the sum (or difference) of the two
//! z-rotations is observable. Extraction then reports `az = 0` and folds the
//! whole z-rotation into `phi`; the derived SPIDER/MRC/XYZ angles are chosen
//! so that feeding them back reproduces the same composite rotation.

use std::fmt;
use std::str::FromStr;

use crate::angle::{wrap_0_360, wrap_pm_180};
use crate::constants::{DEG_TO_RAD, ERR_LIMIT, RAD_TO_DEG};
use crate::errors::{GeomError, GeomResult};
use crate::math::fmod;
use crate::matrix::{Transform, Vec3};

/// Selects a rotation convention for [`Transform::get_rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationConvention {
    Eman,
    Imagic,
    Spider,
    Mrc,
    Xyz,
    Quaternion,
    Spin,
    Sgirot,
    Matrix,
}

impl RotationConvention {
    /// The lowercase name used at string boundaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eman => "eman",
            Self::Imagic => "imagic",
            Self::Spider => "spider",
            Self::Mrc => "mrc",
            Self::Xyz => "xyz",
            Self::Quaternion => "quaternion",
            Self::Spin => "spin",
            Self::Sgirot => "sgirot",
            Self::Matrix => "matrix",
        }
    }
}

impl FromStr for RotationConvention {
    type Err = GeomError;

    fn from_str(s: &str) -> GeomResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "eman" => Ok(Self::Eman),
            "imagic" => Ok(Self::Imagic),
            "spider" => Ok(Self::Spider),
            "mrc" => Ok(Self::Mrc),
            "xyz" => Ok(Self::Xyz),
            "quaternion" => Ok(Self::Quaternion),
            "spin" => Ok(Self::Spin),
            "sgirot" => Ok(Self::Sgirot),
            "matrix" => Ok(Self::Matrix),
            _ => Err(GeomError::invalid_convention(s)),
        }
    }
}

impl fmt::Display for RotationConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rotation expressed in one concrete convention.
///
/// Angles are degrees; quaternion components are unit-length; `Spin` and
/// `Sgirot` carry an axis-angle pair with a unit axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    Eman { az: f64, alt: f64, phi: f64 },
    Imagic { alpha: f64, beta: f64, gamma: f64 },
    Spider { phi: f64, theta: f64, psi: f64 },
    Mrc { phi: f64, theta: f64, omega: f64 },
    Xyz { xtilt: f64, ytilt: f64, ztilt: f64 },
    Quaternion { e0: f64, e1: f64, e2: f64, e3: f64 },
    Spin { omega: f64, n1: f64, n2: f64, n3: f64 },
    Sgirot { q: f64, n1: f64, n2: f64, n3: f64 },
    Matrix([[f64; 3]; 3]),
}

impl Rotation {
    /// Returns the convention this value is expressed in.
    pub fn convention(&self) -> RotationConvention {
        match self {
            Self::Eman { .. } => RotationConvention::Eman,
            Self::Imagic { .. } => RotationConvention::Imagic,
            Self::Spider { .. } => RotationConvention::Spider,
            Self::Mrc { .. } => RotationConvention::Mrc,
            Self::Xyz { .. } => RotationConvention::Xyz,
            Self::Quaternion { .. } => RotationConvention::Quaternion,
            Self::Spin { .. } => RotationConvention::Spin,
            Self::Sgirot { .. } => RotationConvention::Sgirot,
            Self::Matrix(_) => RotationConvention::Matrix,
        }
    }
}

/// The three internal routes into the rotation block.
enum RotationInput {
    Euler { az: f64, alt: f64, phi: f64 },
    Quat { e0: f64, e1: f64, e2: f64, e3: f64 },
    Direct([[f64; 3]; 3]),
}

fn rotation_input(rot: &Rotation) -> RotationInput {
    match *rot {
        Rotation::Eman { az, alt, phi } => RotationInput::Euler { az, alt, phi },
        Rotation::Imagic { alpha, beta, gamma } => RotationInput::Euler {
            az: alpha,
            alt: beta,
            phi: gamma,
        },
        Rotation::Spider { phi, theta, psi } => RotationInput::Euler {
            az: phi + 90.0,
            alt: theta,
            phi: psi - 90.0,
        },
        Rotation::Mrc { phi, theta, omega } => RotationInput::Euler {
            az: phi + 90.0,
            alt: theta,
            phi: 90.0 - omega,
        },
        Rotation::Xyz {
            xtilt,
            ytilt,
            ztilt,
        } => {
            let (sx, cx) = libm::sincos(xtilt * DEG_TO_RAD);
            let (sy, cy) = libm::sincos(ytilt * DEG_TO_RAD);
            RotationInput::Euler {
                az: libm::atan2(-cy * sx, sy) * RAD_TO_DEG + 90.0,
                alt: libm::acos((cy * cx).clamp(-1.0, 1.0)) * RAD_TO_DEG,
                phi: ztilt + libm::atan2(sx, cx * sy) * RAD_TO_DEG - 90.0,
            }
        }
        Rotation::Quaternion { e0, e1, e2, e3 } => RotationInput::Quat { e0, e1, e2, e3 },
        Rotation::Spin { omega, n1, n2, n3 } | Rotation::Sgirot { q: omega, n1, n2, n3 } => {
            let half = omega * DEG_TO_RAD / 2.0;
            let (s, c) = libm::sincos(half);
            RotationInput::Quat {
                e0: c,
                e1: s * n1,
                e2: s * n2,
                e3: s * n3,
            }
        }
        Rotation::Matrix(m) => RotationInput::Direct(m),
    }
}

impl Transform {
    /// Creates a rotation from EMAN angles `(az, alt, phi)` in degrees.
    pub fn from_eman(az: f64, alt: f64, phi: f64) -> Self {
        Self::from_rotation(&Rotation::Eman { az, alt, phi })
    }

    /// Creates a transform from a rotation in any convention.
    pub fn from_rotation(rot: &Rotation) -> Self {
        let mut t = Self::identity();
        t.set_rotation(rot);
        t
    }

    /// Creates a rotation directly from nine matrix entries (row-major).
    pub fn from_matrix(m: [[f64; 3]; 3]) -> Self {
        Self::from_rotation(&Rotation::Matrix(m))
    }

    /// Creates a rotation of `omega_deg` degrees about the unit axis `n`.
    pub fn from_axis_angle(n: Vec3, omega_deg: f64) -> Self {
        Self::from_rotation(&Rotation::Spin {
            omega: omega_deg,
            n1: n.x,
            n2: n.y,
            n3: n.z,
        })
    }

    /// Creates a rotation from a unit quaternion `(e0, e1, e2, e3)`.
    pub fn from_quaternion(e0: f64, e1: f64, e2: f64, e3: f64) -> Self {
        Self::from_rotation(&Rotation::Quaternion { e0, e1, e2, e3 })
    }

    /// Replaces the rotation block, preserving the pre- and post-translation.
    ///
    /// The total-translation column is recomputed from the invariant
    /// `t_total = p_post + R * p_pre` with the new block.
    pub fn set_rotation(&mut self, rot: &Rotation) {
        let pre = self.get_pretrans();
        let post = self.get_posttrans();

        match rotation_input(rot) {
            RotationInput::Euler { az, alt, phi } => {
                let azp = fmod(az, 360.0) * DEG_TO_RAD;
                let altp = alt * DEG_TO_RAD;
                let phip = fmod(phi, 360.0) * DEG_TO_RAD;
                let (saz, caz) = libm::sincos(azp);
                let (salt, calt) = libm::sincos(altp);
                let (sphi, cphi) = libm::sincos(phip);

                self.matrix[0][0] = cphi * caz - calt * saz * sphi;
                self.matrix[0][1] = cphi * saz + calt * caz * sphi;
                self.matrix[0][2] = salt * sphi;
                self.matrix[1][0] = -sphi * caz - calt * saz * cphi;
                self.matrix[1][1] = -sphi * saz + calt * caz * cphi;
                self.matrix[1][2] = salt * cphi;
                self.matrix[2][0] = salt * saz;
                self.matrix[2][1] = -salt * caz;
                self.matrix[2][2] = calt;
            }
            RotationInput::Quat { e0, e1, e2, e3 } => {
                self.matrix[0][0] = e0 * e0 + e1 * e1 - e2 * e2 - e3 * e3;
                self.matrix[0][1] = 2.0 * (e1 * e2 + e0 * e3);
                self.matrix[0][2] = 2.0 * (e1 * e3 - e0 * e2);
                self.matrix[1][0] = 2.0 * (e2 * e1 - e0 * e3);
                self.matrix[1][1] = e0 * e0 - e1 * e1 + e2 * e2 - e3 * e3;
                self.matrix[1][2] = 2.0 * (e2 * e3 + e0 * e1);
                self.matrix[2][0] = 2.0 * (e3 * e1 + e0 * e2);
                self.matrix[2][1] = 2.0 * (e3 * e2 - e0 * e1);
                self.matrix[2][2] = e0 * e0 - e1 * e1 - e2 * e2 + e3 * e3;
            }
            RotationInput::Direct(m) => {
                for i in 0..3 {
                    for j in 0..3 {
                        self.matrix[i][j] = m[i][j];
                    }
                }
            }
        }

        self.matrix[3][0] = post.x;
        self.matrix[3][1] = post.y;
        self.matrix[3][2] = post.z;
        for i in 0..3 {
            self.matrix[i][3] = self.matrix[3][i]
                + self.matrix[i][0] * pre.x
                + self.matrix[i][1] * pre.y
                + self.matrix[i][2] * pre.z;
        }
    }

    /// Builds the rotation taking the unit-vector pair `(a, b)` onto
    /// `(big_a, big_b)`.
    ///
    /// The inputs are normalized internally; the pair must be rigid
    /// (`a . b == big_a . big_b`). The axis is the normal of the two
    /// difference vectors, and the angle is recovered in the plane
    /// perpendicular to it.
    ///
    /// # Errors
    ///
    /// [`GeomError::Numeric`] if a direction degenerates to zero length, so
    /// no axis can be constructed.
    pub fn set_rotation_between(
        &mut self,
        a: Vec3,
        b: Vec3,
        big_a: Vec3,
        big_b: Vec3,
    ) -> GeomResult<()> {
        let a = a.normalize();
        let b = b.normalize();
        let big_a = big_a.normalize();
        let big_b = big_b.normalize();
        if a.magnitude() == 0.0 || b.magnitude() == 0.0 {
            return Err(GeomError::numeric(
                "set_rotation_between",
                "zero-length direction",
            ));
        }

        let a_minus = a - big_a;
        let b_minus = b - big_b;

        let nhat = if a_minus.magnitude() == 0.0 {
            a
        } else if b_minus.magnitude() == 0.0 {
            b
        } else {
            a_minus.cross(&b_minus).normalize()
        };
        if nhat.magnitude() == 0.0 {
            return Err(GeomError::numeric(
                "set_rotation_between",
                "degenerate rotation axis",
            ));
        }

        let nea = a.cross(&nhat);
        let nea_sq = nea.dot(&nea);
        if nea_sq == 0.0 {
            return Err(GeomError::numeric(
                "set_rotation_between",
                "direction parallel to rotation axis",
            ));
        }
        let ne_big_a = big_a.cross(&nhat);
        let cos_omega = nea.dot(&ne_big_a) / nea_sq;
        let sin_omega = nea.dot(&big_a) / nea_sq;
        let omega = libm::atan2(sin_omega, cos_omega) * RAD_TO_DEG;

        self.set_rotation(&Rotation::Spin {
            omega,
            n1: nhat.x,
            n2: nhat.y,
            n3: nhat.z,
        });
        Ok(())
    }

    /// Returns the EMAN `(az, alt, phi)` angles of the rotation block, in
    /// degrees.
    ///
    /// `az` and `phi` are reported in (-180, 180]; `alt` in [0, 180]. At the
    /// gimbal poles (`alt` = 0 or 180) the azimuth is folded into `phi`.
    pub fn eman_angles(&self) -> (f64, f64, f64) {
        let m = &self.matrix;
        let sca = self.get_scale();
        let cosalt = if sca == 0.0 {
            1.0
        } else {
            m[2][2] / sca
        };
        let max = 1.0 - ERR_LIMIT;

        let (az, alt, phi);
        if cosalt > max {
            alt = 0.0;
            az = 0.0;
            phi = libm::atan2(m[0][1], m[0][0]) * RAD_TO_DEG;
        } else if cosalt < -max {
            alt = 180.0;
            az = 0.0;
            phi = 360.0 - libm::atan2(m[0][1], m[0][0]) * RAD_TO_DEG;
        } else {
            alt = libm::acos(cosalt.clamp(-1.0, 1.0)) * RAD_TO_DEG;
            az = 360.0 + libm::atan2(m[2][0], -m[2][1]) * RAD_TO_DEG;
            phi = 360.0 + libm::atan2(m[0][2], m[1][2]) * RAD_TO_DEG;
        }

        (wrap_pm_180(az), alt, wrap_pm_180(phi))
    }

    /// Reads the rotation block in the requested convention.
    ///
    /// All conventions extract through the EMAN angles; see the module docs
    /// for the cross-walk and the gimbal-pole policy.
    pub fn get_rotation(&self, convention: RotationConvention) -> Rotation {
        let (az, alt, phi) = self.eman_angles();

        // SPIDER-style first/third Euler, shared by several conventions. At
        // the poles the whole z-rotation lives in psi so that feeding the
        // pair back reproduces the composite rotation.
        let gimbal = alt == 0.0 || alt == 180.0;
        let (phi_s, psi_s) = if gimbal {
            (0.0, wrap_0_360(phi))
        } else {
            (wrap_0_360(az - 90.0), wrap_0_360(phi + 90.0))
        };

        match convention {
            RotationConvention::Eman => Rotation::Eman { az, alt, phi },
            RotationConvention::Imagic => Rotation::Imagic {
                alpha: az,
                beta: alt,
                gamma: phi,
            },
            RotationConvention::Spider => Rotation::Spider {
                phi: phi_s,
                theta: alt,
                psi: psi_s,
            },
            RotationConvention::Mrc => Rotation::Mrc {
                phi: phi_s,
                theta: alt,
                omega: wrap_0_360(180.0 - psi_s),
            },
            RotationConvention::Xyz => {
                let phi_s_rad = phi_s * DEG_TO_RAD;
                let alt_rad = alt * DEG_TO_RAD;
                let xtilt = libm::atan2(
                    -libm::sin(phi_s_rad) * libm::sin(alt_rad),
                    libm::cos(alt_rad),
                );
                let ytilt = libm::asin((libm::cos(phi_s_rad) * libm::sin(alt_rad)).clamp(-1.0, 1.0));
                let ztilt = psi_s * DEG_TO_RAD
                    - libm::atan2(libm::sin(xtilt), libm::cos(xtilt) * libm::sin(ytilt));
                Rotation::Xyz {
                    xtilt: wrap_pm_180(xtilt * RAD_TO_DEG),
                    ytilt: ytilt * RAD_TO_DEG,
                    ztilt: wrap_pm_180(ztilt * RAD_TO_DEG),
                }
            }
            RotationConvention::Quaternion => {
                let (e0, n1, n2, n3, _omega) = self.spin_parts(az, alt, phi);
                let sin_half = libm::sqrt((1.0 - e0 * e0).max(0.0));
                Rotation::Quaternion {
                    e0,
                    e1: sin_half * n1,
                    e2: sin_half * n2,
                    e3: sin_half * n3,
                }
            }
            RotationConvention::Spin => {
                let (_e0, n1, n2, n3, omega) = self.spin_parts(az, alt, phi);
                Rotation::Spin { omega, n1, n2, n3 }
            }
            RotationConvention::Sgirot => {
                let (_e0, n1, n2, n3, omega) = self.spin_parts(az, alt, phi);
                Rotation::Sgirot { q: omega, n1, n2, n3 }
            }
            RotationConvention::Matrix => {
                let mut m = [[0.0; 3]; 3];
                for (i, row) in m.iter_mut().enumerate() {
                    for (j, entry) in row.iter_mut().enumerate() {
                        *entry = self.matrix[i][j];
                    }
                }
                Rotation::Matrix(m)
            }
        }
    }

    /// Returns the rotation axis of the transform (unit vector).
    pub fn get_spin_axis(&self) -> Vec3 {
        let (az, alt, phi) = self.eman_angles();
        let (_e0, n1, n2, n3, _omega) = self.spin_parts(az, alt, phi);
        Vec3::new(n1, n2, n3)
    }

    /// Returns the rotation angle of the transform in degrees, in [0, 180].
    pub fn get_spin_angle(&self) -> f64 {
        let (az, alt, phi) = self.eman_angles();
        let (_e0, _n1, _n2, _n3, omega) = self.spin_parts(az, alt, phi);
        omega
    }

    /// Quaternion decomposition of the EMAN angles: `(e0, n1, n2, n3, omega)`
    /// with `e0 >= 0` and a unit axis.
    ///
    /// The identity rotation has no axis; `(0, 0, 1)` is reported there.
    fn spin_parts(&self, az: f64, alt: f64, phi: f64) -> (f64, f64, f64, f64, f64) {
        let half_sum = (az + phi) / 2.0 * DEG_TO_RAD;
        let half_alt = alt / 2.0 * DEG_TO_RAD;
        let mut e0 = libm::cos(half_sum) * libm::cos(half_alt);
        let sin_half = libm::sqrt((1.0 - e0 * e0).max(0.0));

        if sin_half < ERR_LIMIT {
            return (1.0, 0.0, 0.0, 1.0, 0.0);
        }

        let cos_n_theta = (libm::sin(half_sum) * libm::cos(half_alt) / sin_half).clamp(-1.0, 1.0);
        let sin_n_theta = libm::sqrt(1.0 - cos_n_theta * cos_n_theta);
        let n_phi = (az - phi) / 2.0 * DEG_TO_RAD;
        let mut n1 = sin_n_theta * libm::cos(n_phi);
        let mut n2 = sin_n_theta * libm::sin(n_phi);
        let mut n3 = cos_n_theta;

        if e0 < 0.0 {
            e0 = -e0;
            n1 = -n1;
            n2 = -n2;
            n3 = -n3;
        }

        let omega = 2.0 * libm::acos(e0.clamp(-1.0, 1.0)) * RAD_TO_DEG;
        (e0, n1, n2, n3, omega)
    }
}

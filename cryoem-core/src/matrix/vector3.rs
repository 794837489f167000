//! 3D Cartesian vectors for orientation and translation math.
//!
//! Vectors do double duty in this library: they carry particle translations
//! (in pixels) through the affine [`Transform`](super::Transform), and they
//! represent directions on the unit sphere -- most importantly the *pole* of
//! an orientation, the image of `(0, 0, 1)` under a rotation, which indexes
//! that orientation for asymmetric-unit tests.
//!
//! # Cartesian vs Angular
//!
//! Orientations are usually handed around as Euler angles in degrees, but the
//! geometric predicates (asymmetric-unit membership, spherical-triangle
//! intersection, nearest-neighbor repulsion) are cleanest in Cartesian form.
//! The typical workflow is:
//!
//! 1. Convert `(alt, az)` to a unit direction with [`from_alt_az`](Vec3::from_alt_az)
//! 2. Apply rotations, intersections, repulsion steps
//! 3. Convert back with [`to_alt_az`](Vec3::to_alt_az)
//!
//! # Dot and Cross Products
//!
//! For unit vectors, `a.dot(&b)` equals the cosine of the angular separation,
//! and `a.cross(&b)` gives the rotation axis taking one direction toward the
//! other -- the building block of the vector-pair rotation constructor on
//! [`Transform`](super::Transform).
//!
//! ```
//! use cryoem_core::Vec3;
//!
//! let a = Vec3::x_axis();
//! let b = Vec3::y_axis();
//! assert_eq!(a.dot(&b), 0.0);
//! assert_eq!(a.cross(&b), Vec3::z_axis());
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// A 3D Cartesian vector.
///
/// Components are public for direct access. Construction:
///
/// ```
/// use cryoem_core::Vec3;
///
/// let v = Vec3::new(1.0, 2.0, 3.0);
/// let z = Vec3::z_axis();
/// let w = Vec3::from_array([1.0, 2.0, 3.0]);
/// assert_eq!(v, w);
/// assert_eq!(z[2], 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new vector from x, y, z components.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the zero vector `[0, 0, 0]`.
    #[inline]
    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the unit vector along the X axis `[1, 0, 0]`.
    #[inline]
    pub fn x_axis() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Returns the unit vector along the Y axis `[0, 1, 0]`.
    #[inline]
    pub fn y_axis() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Returns the unit vector along the Z axis `[0, 0, 1]`.
    ///
    /// This is the reference pole: orientations are indexed by where a
    /// rotation sends it.
    #[inline]
    pub fn z_axis() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Creates a vector from a `[x, y, z]` array.
    #[inline]
    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Returns the components as a `[x, y, z]` array.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Builds the unit direction with the given altitude and azimuth, both in
    /// degrees.
    ///
    /// The convention matches the pole of an `(az, alt, *)` rotation:
    /// altitude is measured down from +Z, azimuth turns the direction about
    /// +Z starting from -Y toward +X.
    pub fn from_alt_az(alt_deg: f64, az_deg: f64) -> Self {
        let alt = alt_deg * crate::constants::DEG_TO_RAD;
        let az = az_deg * crate::constants::DEG_TO_RAD;
        let (sin_alt, cos_alt) = libm::sincos(alt);
        let (sin_az, cos_az) = libm::sincos(az);
        Self::new(sin_alt * sin_az, -sin_alt * cos_az, cos_alt)
    }

    /// Returns `(alt, az)` in degrees for this direction.
    ///
    /// Inverse of [`from_alt_az`](Self::from_alt_az) for unit vectors;
    /// non-unit input is normalized implicitly through the `atan2`/`acos`
    /// arithmetic. The azimuth is reported in [0, 360).
    pub fn to_alt_az(&self) -> (f64, f64) {
        let r = self.magnitude();
        let c = if r == 0.0 {
            1.0
        } else {
            (self.z / r).clamp(-1.0, 1.0)
        };
        let alt = libm::acos(c) * crate::constants::RAD_TO_DEG;
        let az = libm::atan2(self.x, -self.y) * crate::constants::RAD_TO_DEG;
        (alt, crate::angle::wrap_0_360(az))
    }

    /// Returns the Euclidean length (L2 norm) of the vector.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.squared_length())
    }

    /// Alias for [`magnitude`](Self::magnitude), matching the naming used by
    /// the rest of the orientation code.
    #[inline]
    pub fn length(&self) -> f64 {
        self.magnitude()
    }

    /// Returns the squared length.
    ///
    /// Faster than [`length`](Self::length) when only comparing distances,
    /// as in nearest-pair searches.
    #[inline]
    pub fn squared_length(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns a unit vector pointing in the same direction.
    ///
    /// If the vector has zero length, returns it unchanged (avoids NaN).
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            Self::new(self.x / mag, self.y / mag, self.z / mag)
        }
    }

    /// Computes the dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product with another vector (right-hand rule).
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index {} out of bounds (valid range: 0-2)", index),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index {} out of bounds (valid range: 0-2)", index),
        }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:12.9} {:12.9} {:12.9}]", self.x, self.y, self.z)
    }
}

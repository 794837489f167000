#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Tolerance used when deciding that a rotation matrix sits at a gimbal pole,
/// that a barycentric coordinate lies on a triangle edge, or that a
/// determinant is effectively zero.
pub const ERR_LIMIT: f64 = 1.0e-6;

/// Altitude of the tetrahedral second latitude band: acos(-1/3) in degrees.
#[allow(clippy::excessive_precision)]
pub const TET_FACE_ALT_DEG: f64 = 109.47122063449069136;

/// Altitude of the icosahedral second latitude band: atan(2) in degrees.
#[allow(clippy::excessive_precision)]
pub const ICOS_FACE_ALT_DEG: f64 = 63.434948822922010648;

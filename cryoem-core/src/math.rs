#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * crate::constants::DEG_TO_RAD
}

#[inline]
pub fn rad2deg(rad: f64) -> f64 {
    rad * crate::constants::RAD_TO_DEG
}

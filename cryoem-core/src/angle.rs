//! Angle normalization for Euler-angle conventions.
//!
//! Different angular quantities in this library live in different ranges:
//!
//! | Quantity | Range | Function |
//! |----------|-------|----------|
//! | Azimuth, spiral azimuth | [0, 360) | [`wrap_0_360`] |
//! | Extracted az / phi | (-180, 180] | [`wrap_pm_180`] |
//!
//! # Wrapping vs Clamping
//!
//! **Wrapping** preserves the direction: an azimuth of 370 degrees is the
//! same direction as 10 degrees. Altitude is never wrapped here -- the Euler
//! extraction produces it through `acos`, which already lands in [0, 180].
//!
//! # Algorithm Notes
//!
//! The wrapping functions use `libm::fmod` (via [`crate::math::fmod`]) rather
//! than the `%` operator because Rust's `%` is a remainder, not a modulo: for
//! negative inputs the sign of the dividend is kept, so a second adjustment
//! pass is needed after `fmod`.

use crate::math::fmod;

/// Wraps an angle in degrees to [0, 360).
///
/// ```
/// use cryoem_core::angle::wrap_0_360;
///
/// assert!((wrap_0_360(-30.0) - 330.0).abs() < 1e-12);
/// assert!((wrap_0_360(725.0) - 5.0).abs() < 1e-12);
/// assert_eq!(wrap_0_360(0.0), 0.0);
/// ```
pub fn wrap_0_360(deg: f64) -> f64 {
    let mut x = fmod(deg, 360.0);
    if x < 0.0 {
        x += 360.0;
    }
    x
}

/// Wraps an angle in degrees to (-180, 180].
///
/// This is the range the Euler extraction reports `az` and `phi` in.
///
/// ```
/// use cryoem_core::angle::wrap_pm_180;
///
/// assert!((wrap_pm_180(270.0) + 90.0).abs() < 1e-12);
/// assert!((wrap_pm_180(-190.0) - 170.0).abs() < 1e-12);
/// assert_eq!(wrap_pm_180(180.0), 180.0);
/// ```
pub fn wrap_pm_180(deg: f64) -> f64 {
    let x = fmod(deg + 180.0, 360.0);
    let x = if x <= 0.0 { x + 360.0 } else { x };
    x - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_0_360_identity_range() {
        for &a in &[0.0, 45.0, 180.0, 359.5] {
            assert!((wrap_0_360(a) - a).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wrap_0_360_negative() {
        assert!((wrap_0_360(-720.0)).abs() < 1e-12);
        assert!((wrap_0_360(-359.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_pm_180_bounds() {
        for &a in &[-539.0, -180.0, -0.5, 0.0, 179.9, 180.0, 540.0] {
            let w = wrap_pm_180(a);
            assert!(w > -180.0 && w <= 180.0, "wrap_pm_180({}) = {}", a, w);
        }
    }

    #[test]
    fn test_wrap_pm_180_negative_boundary() {
        // -180 is reported as +180, keeping the range half-open.
        assert!((wrap_pm_180(-180.0) - 180.0).abs() < 1e-12);
    }
}

//! Math utilities for noise generation and blending.
//!
//! Every helper here reproduces the exact floating point behaviour the
//! historical terrain generator relied on, so results stay bit-identical.

/// Smoothstep - quintic Hermite interpolation (NOT cubic!)
///
/// Formula: 6x^5 - 15x^4 + 10x^3
///
/// This is the fade curve used by gradient noise.
#[inline]
#[must_use]
pub fn smoothstep(x: f64) -> f64 {
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// Smoothstep derivative for noise with derivatives.
///
/// Formula: 30x^2(x-1)^2
#[inline]
#[must_use]
pub fn smoothstep_derivative(x: f64) -> f64 {
    30.0 * x * x * (x - 1.0) * (x - 1.0)
}

/// Floor function returning an `i32`.
///
/// A plain `as i32` cast truncates toward zero, so negative values with a
/// fractional part need to step down by one.
#[inline]
#[must_use]
pub fn floor(v: f64) -> i32 {
    let i = v as i32;
    if v < f64::from(i) { i - 1 } else { i }
}

/// Floor function returning an `i64`.
#[inline]
#[must_use]
pub fn lfloor(v: f64) -> i64 {
    let i = v as i64;
    if v < i as f64 { i - 1 } else { i }
}

/// Floor division for integers (rounds toward negative infinity).
#[inline]
#[must_use]
pub const fn floor_div(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Modulo whose result always has the sign of the divisor.
///
/// Computed as `((a % b) + b) % b` so a result that rounds up to `b`
/// folds back to zero.
#[inline]
#[must_use]
pub fn positive_modulo(a: f64, b: f64) -> f64 {
    (a % b + b) % b
}

/// Linear interpolation.
///
/// Formula: a + alpha * (b - a)
#[inline]
#[must_use]
pub fn lerp(alpha: f64, a: f64, b: f64) -> f64 {
    a + alpha * (b - a)
}

/// Bilinear interpolation.
///
/// Interpolates between 4 values in a 2D grid.
#[inline]
#[must_use]
pub fn lerp2(a1: f64, a2: f64, x00: f64, x10: f64, x01: f64, x11: f64) -> f64 {
    lerp(a2, lerp(a1, x00, x10), lerp(a1, x01, x11))
}

/// Trilinear interpolation.
///
/// Interpolates between 8 values in a 3D grid.
#[inline]
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn lerp3(
    a1: f64,
    a2: f64,
    a3: f64,
    x000: f64,
    x100: f64,
    x010: f64,
    x110: f64,
    x001: f64,
    x101: f64,
    x011: f64,
    x111: f64,
) -> f64 {
    lerp(
        a3,
        lerp2(a1, a2, x000, x100, x010, x110),
        lerp2(a1, a2, x001, x101, x011, x111),
    )
}

/// Clamped linear interpolation.
///
/// Returns `min` below factor 0 and `max` above factor 1 without evaluating
/// the lerp, so a saturated factor never mixes in the other endpoint.
#[inline]
#[must_use]
pub fn clamped_lerp(min: f64, max: f64, factor: f64) -> f64 {
    if factor < 0.0 {
        min
    } else if factor > 1.0 {
        max
    } else {
        lerp(factor, min, max)
    }
}

/// Clamp a value to the range [min, max].
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Euclidean length of a 2D vector.
#[inline]
#[must_use]
pub fn length2(x: f64, z: f64) -> f64 {
    (x * x + z * z).sqrt()
}

/// Euclidean length of a 3D vector.
#[inline]
#[must_use]
pub fn length3(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor() {
        assert_eq!(floor(1.5), 1);
        assert_eq!(floor(1.0), 1);
        assert_eq!(floor(0.5), 0);
        assert_eq!(floor(0.0), 0);
        assert_eq!(floor(-0.5), -1);
        assert_eq!(floor(-1.0), -1);
        assert_eq!(floor(-1.5), -2);
        assert_eq!(lfloor(-0.25), -1);
        assert_eq!(lfloor(5.0e9), 5_000_000_000);
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(floor_div(7, 8), 0);
        assert_eq!(floor_div(8, 8), 1);
        assert_eq!(floor_div(-1, 8), -1);
        assert_eq!(floor_div(-8, 8), -1);
        assert_eq!(floor_div(-9, 8), -2);
    }

    #[test]
    fn test_positive_modulo() {
        assert!((positive_modulo(70.5, 8.0) - 6.5).abs() < 1e-12);
        assert!((positive_modulo(-1.5, 8.0) - 6.5).abs() < 1e-12);
        assert!(positive_modulo(-16.0, 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothstep() {
        // At boundaries
        assert!((smoothstep(0.0) - 0.0).abs() < 1e-10);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-10);
        // At midpoint
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-10);
        assert!(smoothstep_derivative(0.0).abs() < 1e-10);
        assert!(smoothstep_derivative(1.0).abs() < 1e-10);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 10.0, 20.0) - 10.0).abs() < 1e-10);
        assert!((lerp(1.0, 10.0, 20.0) - 20.0).abs() < 1e-10);
        assert!((lerp(0.5, 10.0, 20.0) - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_clamped_lerp_saturates() {
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(clamped_lerp(3.0, 7.0, -0.5), 3.0);
            assert_eq!(clamped_lerp(3.0, 7.0, 1.5), 7.0);
        }
        assert!((clamped_lerp(3.0, 7.0, 0.25) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_length() {
        assert!((length2(3.0, 4.0) - 5.0).abs() < 1e-12);
        assert!((length3(2.0, 3.0, 6.0) - 7.0).abs() < 1e-12);
    }
}

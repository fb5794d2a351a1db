//! Scalar constants and helpers shared by every other module.
//!
//! The inverse-trig wrappers here are the crate's core numerical-robustness
//! decision: a dot product that is mathematically in `[-1, 1]` can land at
//! `1.0000000001` after round-off, and feeding that to [`f64::acos`] yields
//! `NaN`. Clamping first turns the out-of-domain input into a saturated but
//! well-defined result.

/// Component-wise tolerance used by the `almost_eq` family of comparisons.
pub const EPSILON: f64 = 1e-8;

/// Archimedes' constant.
pub const PI: f64 = std::f64::consts::PI;

/// π/2.
pub const HALFPI: f64 = std::f64::consts::FRAC_PI_2;

/// Largest representable value.
pub const MAX: f64 = f64::MAX;

/// Most negative representable value.
pub const MIN: f64 = f64::MIN;

/// Smallest positive normal value, used as a division-safety floor: lengths,
/// determinants and scale components below this are treated as degenerate.
pub const SMALLEST: f64 = f64::MIN_POSITIVE;

/// Clamps `v` to `[lo, hi]`. Out-of-range input is not an error.
#[must_use]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Arc cosine with the argument clamped to `[-1, 1]` first.
#[must_use]
pub fn acos(x: f64) -> f64 {
    clamp(x, -1.0, 1.0).acos()
}

/// Arc sine with the argument clamped to `[-1, 1]` first.
#[must_use]
pub fn asin(x: f64) -> f64 {
    clamp(x, -1.0, 1.0).asin()
}

/// Returns whether `a` and `b` differ by at most `epsilon`.
///
/// Symmetric, and reflexive for any `epsilon >= 0`.
#[must_use]
pub fn almost_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Returns whether `v` is within [`EPSILON`] of zero.
#[must_use]
pub fn is_close_to_zero(v: f64) -> bool {
    almost_equal(v, 0.0, EPSILON)
}

/// Converts radians to degrees.
#[must_use]
pub fn to_degrees(x: f64) -> f64 {
    x * (180.0 / PI)
}

/// Converts degrees to radians.
#[must_use]
pub fn to_radians(x: f64) -> f64 {
    x * (PI / 180.0)
}

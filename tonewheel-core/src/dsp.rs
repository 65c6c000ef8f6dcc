//! Generic DSP utilities and math helpers.
//!
//! These are the numeric services an oscillator expects from its host:
//! sine evaluation on a phase measured in cycles, cubic saturation, float to
//! Q31 conversion and 10-bit parameter normalization.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` approximations for hot paths
//! - Clean, side-effect free helpers that are easy to test

#![allow(clippy::excessive_precision)]

use core::f32::consts::PI;

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] pub(crate) fn m_floor(x: f32) -> f32 { x.floor() }
        #[inline] pub(crate) fn m_ln(x: f32) -> f32 { x.ln() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { libm::sinf(x) }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { libm::expf(x) }
        #[inline] pub(crate) fn m_floor(x: f32) -> f32 { libm::floorf(x) }
        #[inline] pub(crate) fn m_ln(x: f32) -> f32 { libm::logf(x) }
    // std backend
    } else {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] pub(crate) fn m_floor(x: f32) -> f32 { x.floor() }
        #[inline] pub(crate) fn m_ln(x: f32) -> f32 { x.ln() }
    }
}

// --------------------------------- Constants -------------------------------------

/// 2π (commonly useful)
pub const TAU: f32 = 2.0 * PI;

#[cfg(feature = "fast-math")]
const HALF_PI: f32 = 0.5 * PI;

/// Largest Q31 value as a float scale factor (`0x7FFF_FFFF`).
pub const Q31_SCALE: f32 = 2_147_483_647.0;

/// Reciprocal of the full Q31 range (`1 / 0x8000_0000`).
pub const Q31_RECIP: f32 = 1.0 / 2_147_483_648.0;

/// 10-bit parameter range reciprocal (`1 / 1023`).
pub const PARAM_10BIT_RECIP: f32 = 9.775_171_065_493_65e-4;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    num_traits::clamp(x, lo, hi)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fractional part in [0, 1), also for negative inputs.
#[inline]
pub fn wrap01(x: f32) -> f32 {
    let f = x - m_floor(x);
    if f >= 1.0 { 0.0 } else { f }
}

// --------------------------------- Fast trig -------------------------------------

/// Fast sine: range reduction into [-π, π], folded onto [-π/2, π/2] via
/// `sin(π - x) = sin(x)`, then a 5th-order odd polynomial.
/// Max abs error ~2e-4 when `fast-math` is enabled; exact otherwise.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let mut xr = x;
            let k = m_floor(xr / TAU + 0.5);
            xr -= k * TAU;

            if xr > HALF_PI {
                xr = PI - xr;
            } else if xr < -HALF_PI {
                xr = -PI - xr;
            }

            // sin(x) ≈ x * (a + b x^2 + c x^4), fitted on [-π/2, π/2]
            let x2 = xr * xr;
            xr * (0.999_694_9 + x2 * (-0.165_670_0 + x2 * 0.007_513_4))
        } else {
            m_sin(x)
        }
    }
}

/// Sine of a phase given in **cycles** (period 1.0), like a wavetable lookup.
///
/// Any real phase is accepted; it is reduced to [0, 1) before evaluation so
/// large accumulators (up to a few hundred cycles) keep full precision.
#[inline]
pub fn sin_cycles(x: f32) -> f32 {
    let p = wrap01(x);
    // [0,1) -> [-π, π) keeps the polynomial path inside its best range
    let xr = if p < 0.5 { TAU * p } else { TAU * (p - 1.0) };
    fast_sin(xr)
}

// --------------------------------- Nonlinearities --------------------------------

/// Saturating cubic soft clip.
///
/// The input is clipped to [-1, 1] and shaped with `1.5x - 0.5x^3`, which is
/// monotonic with zero slope at ±1. Output is always within [-1, 1].
///
/// Small-signal gain is 1.5. The hardware platform's table-driven curve is
/// slightly hotter near zero, so voices rendered here sit a little quieter
/// than on the synth at moderate levels.
#[inline]
pub fn sat_cubic(x: f32) -> f32 {
    let xc = clamp(x, -1.0, 1.0);
    1.5 * xc - 0.5 * xc * xc * xc
}

// --------------------------------- Fixed point -----------------------------------

/// Float in [-1, 1] to Q31. Out-of-range and NaN inputs saturate (`as` casts saturate).
#[inline]
pub fn f32_to_q31(x: f32) -> i32 {
    (x * Q31_SCALE) as i32
}

/// Q31 to float in [-1, 1).
#[inline]
pub fn q31_to_f32(x: i32) -> f32 {
    x as f32 * Q31_RECIP
}

/// 10-bit raw parameter value (0..=1023) to [0, 1].
#[inline]
pub fn param_val_to_f32(value: u16) -> f32 {
    clamp(f32::from(value) * PARAM_10BIT_RECIP, 0.0, 1.0)
}

// --------------------------------- Tests (std only) ------------------------------

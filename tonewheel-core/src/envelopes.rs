//! Fixed-decay burst envelopes.
//!
//! Provided envelopes:
//! - `ExpDecay`    : multiplicative (RC-like) decay, used for key click noise
//! - `LinearDecay` : constant-step decay with a floor clamp, used for percussion
//!
//! Both are retriggered to an absolute level (not a gate) and decay on their
//! own; there is no release stage. Each exposes a per-sample `next()` that
//! returns the value for the current sample and then advances.
//!
//! All envelopes are `no_std` friendly and avoid heap allocations.

use core::fmt::Debug;

use crate::dsp::{m_exp, m_ln};

/// Per-sample decay factor giving the same decay *time* at `to_sr` as `decay` gives at `from_sr`.
///
/// `decay^(from_sr / to_sr)`. Factors outside (0, 1] are returned unchanged.
#[inline]
pub fn rescale_exp_decay(decay: f32, from_sr: f32, to_sr: f32) -> f32 {
    if decay <= 0.0 || decay >= 1.0 {
        return decay;
    }
    m_exp(m_ln(decay) * from_sr / to_sr.max(1.0))
}

/// Per-sample step giving the same ramp duration at `to_sr` as `step` gives at `from_sr`.
#[inline]
pub fn rescale_linear_step(step: f32, from_sr: f32, to_sr: f32) -> f32 {
    step * from_sr / to_sr.max(1.0)
}

/// Decay rate is per sample; the 48 kHz reference values live in the oscillator config.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExpDecay {
    env:   f32,
    decay: f32,
}

impl ExpDecay {
    #[inline]
    pub fn new(initial: f32, decay: f32) -> Self {
        Self { env: initial, decay }
    }

    #[inline] pub fn trigger(&mut self, level: f32) { self.env = level; }

    /// Value for this sample; the stored level is then multiplied by the decay.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let v = self.env;
        self.env *= self.decay;
        v
    }

    #[inline] pub fn value(&self) -> f32 { self.env }
}

/// Linear decay by `step` per sample while positive.
///
/// The floor is applied one sample late: a positive level is decremented even
/// if that takes it below zero, and a negative level is clamped to zero on the
/// following sample. A level that lands exactly on a tiny positive residual
/// keeps decrementing, so the envelope never undershoots by more than `step`.
/// With `exact_floor` the decrement itself stops at zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearDecay {
    env:         f32,
    step:        f32,
    exact_floor: bool,
}

impl LinearDecay {
    #[inline]
    pub fn new(initial: f32, step: f32, exact_floor: bool) -> Self {
        Self { env: initial, step, exact_floor }
    }

    #[inline] pub fn trigger(&mut self, level: f32) { self.env = level; }

    #[inline]
    pub fn next(&mut self) -> f32 {
        let v = self.env;
        if self.env > 0.0 {
            self.env -= self.step;
            if self.exact_floor && self.env < 0.0 {
                self.env = 0.0;
            }
        } else if self.env < 0.0 {
            self.env = 0.0;
        }
        v
    }

    #[inline] pub fn value(&self) -> f32 { self.env }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_decay_returns_then_decays() {
        let mut e = ExpDecay::new(2.0, 0.5);
        assert_eq!(e.next(), 2.0);
        assert_eq!(e.value(), 1.0);
        assert_eq!(e.next(), 1.0);
        assert_eq!(e.value(), 0.5);
    }

    #[test]
    fn exp_decay_dies_away() {
        let mut e = ExpDecay::new(2.0, 0.995);
        for _ in 0..48_000 { e.next(); }
        assert!(e.value() >= 0.0 && e.value() < 1e-6, "v={}", e.value());
    }

    #[test]
    fn rescaled_decay_keeps_decay_time() {
        let d96 = rescale_exp_decay(0.995, 48_000.0, 96_000.0);
        assert!((d96 * d96 - 0.995).abs() < 1e-5, "d96={d96}");
        assert!((rescale_exp_decay(0.995, 48_000.0, 48_000.0) - 0.995).abs() < 1e-6);
        assert_eq!(rescale_exp_decay(1.0, 48_000.0, 96_000.0), 1.0);
        let s = rescale_linear_step(0.00001, 48_000.0, 24_000.0);
        assert!((s - 0.00002).abs() < 1e-9);
    }

    #[test]
    fn linear_decay_floor_is_late() {
        let mut e = LinearDecay::new(0.25, 1.0, false);
        e.next();
        assert_eq!(e.value(), -0.75);
        e.next();
        assert_eq!(e.value(), 0.0);
        e.next();
        assert_eq!(e.value(), 0.0);
    }

    #[test]
    fn linear_decay_exact_floor_stops_at_zero() {
        let mut e = LinearDecay::new(0.25, 1.0, true);
        e.next();
        assert_eq!(e.value(), 0.0);
    }

    #[test]
    fn linear_decay_is_monotonic() {
        let mut e = LinearDecay::new(2.0, 0.00001, false);
        let mut prev = e.value();
        for _ in 0..250_000 {
            e.next();
            // the late floor is the only upward move allowed
            assert!(e.value() <= prev || e.value() == 0.0);
            assert!(e.value() >= -0.000_011);
            prev = e.value();
        }
        assert!(e.value().abs() <= 0.00001);
    }
}

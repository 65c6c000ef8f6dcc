//! Host utility services consumed by the oscillator.
//!
//! The oscillator never talks to the platform directly; everything it needs
//! from the outside world (pitch tables, sine, noise, numeric formatting) goes
//! through the [`Host`] trait. [`PlatformHost`] is the stock implementation on
//! top of `tonewheel-core`. Tests swap in their own hosts to pin pitch or
//! silence the noise source.

use tonewheel_core::dsp::{f32_to_q31, param_val_to_f32, sat_cubic, sin_cycles};
use tonewheel_core::noise::{WhiteNoise, DEFAULT_SEED};
use tonewheel_core::pitch::{note_hz, w0_for_note, PLATFORM_SAMPLE_RATE};

/// Services the platform provides to an oscillator.
///
/// Only the noise source is stateful. The pure services have defaults that
/// match the reference platform.
pub trait Host {
    /// Phase increment in cycles per sample for a note and fine offset (0..=255).
    fn phase_increment(&self, note: u8, fine: u8) -> f32;

    /// Frequency in Hz of a note number.
    fn note_hz(&self, note: u8) -> f32;

    /// One white noise sample in [-1, 1).
    fn white(&mut self) -> f32;

    /// Sine of a phase measured in cycles.
    #[inline]
    fn sin(&self, phase: f32) -> f32 {
        sin_cycles(phase)
    }

    /// Raw 10-bit control value to [0, 1].
    #[inline]
    fn param_to_f32(&self, value: u16) -> f32 {
        param_val_to_f32(value)
    }

    /// Saturating cubic soft clip; output in [-1, 1].
    #[inline]
    fn sat_cubic(&self, x: f32) -> f32 {
        sat_cubic(x)
    }

    /// Output sample formatting.
    #[inline]
    fn to_q31(&self, x: f32) -> i32 {
        f32_to_q31(x)
    }
}

/// Stock host: equal-tempered pitch at a fixed sample rate and xorshift noise.
#[derive(Copy, Clone, Debug)]
pub struct PlatformHost {
    sr: f32,
    noise: WhiteNoise,
}

impl PlatformHost {
    #[inline]
    pub fn new(sample_rate: f32) -> Self {
        Self { sr: sample_rate.max(1.0), noise: WhiteNoise::new(DEFAULT_SEED) }
    }

    #[inline]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.noise = WhiteNoise::new(seed);
        self
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }
}

impl Default for PlatformHost {
    fn default() -> Self { Self::new(PLATFORM_SAMPLE_RATE) }
}

impl Host for PlatformHost {
    #[inline]
    fn phase_increment(&self, note: u8, fine: u8) -> f32 {
        w0_for_note(note, fine, self.sr)
    }

    #[inline]
    fn note_hz(&self, note: u8) -> f32 {
        note_hz(note)
    }

    #[inline]
    fn white(&mut self) -> f32 {
        self.noise.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_host_uses_sample_rate() {
        let h48 = PlatformHost::default();
        let h96 = PlatformHost::new(96_000.0);
        let a = h48.phase_increment(69, 0);
        let b = h96.phase_increment(69, 0);
        assert!((a - 2.0 * b).abs() < 1e-7);
        assert!((h48.note_hz(69) - 440.0).abs() < 0.01);
    }

    #[test]
    fn seeded_hosts_repeat_noise() {
        let mut a = PlatformHost::default().with_seed(99);
        let mut b = PlatformHost::default().with_seed(99);
        for _ in 0..32 {
            assert_eq!(a.white(), b.white());
        }
    }

    #[test]
    fn default_services_match_core() {
        let h = PlatformHost::default();
        assert!((h.sin(0.25) - 1.0).abs() < 1e-3);
        assert_eq!(h.sat_cubic(3.0), 1.0);
        assert_eq!(h.to_q31(0.0), 0);
        assert!((h.param_to_f32(1023) - 1.0).abs() < 1e-6);
    }
}

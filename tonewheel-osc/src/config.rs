//! Oscillator tuning constants.
//!
//! The defaults reproduce the reference voice at 48 kHz. Decay constants are
//! per-sample; use [`OscConfig::for_sample_rate`] to keep decay times when
//! running at another rate.

use core::fmt;

use tonewheel_core::envelopes::{rescale_exp_decay, rescale_linear_step};
use tonewheel_core::pitch::PLATFORM_SAMPLE_RATE;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OscConfig {
    /// Harmonics whose frequency would pass this ceiling are dropped an octave.
    pub foldback_hz: f32,
    /// Pre-saturation gain applied to the harmonic sum.
    pub output_gain: f32,
    /// Number of parameter calls swallowed after `init`.
    pub startup_debounce: u8,
    /// Per-sample multiplier of the click envelope.
    pub click_decay: f32,
    /// Per-sample decrement of the percussion envelope.
    pub percussion_step: f32,
    /// Level both envelopes jump to on note-on.
    pub note_on_level: f32,
    /// Percussion envelope after `init`.
    pub initial_percussion_envelope: f32,
    /// Stop the percussion decrement at exactly zero instead of clamping one sample late.
    pub exact_percussion_floor: bool,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            foldback_hz: 5925.0,
            output_gain: 0.2,
            startup_debounce: 30,
            click_decay: 0.995,
            percussion_step: 0.000_01,
            note_on_level: 2.0,
            initial_percussion_envelope: 0.0,
            exact_percussion_floor: false,
        }
    }
}

impl OscConfig {
    /// Defaults with decay constants rescaled from 48 kHz to `sr`.
    pub fn for_sample_rate(sr: f32) -> Self {
        let base = Self::default();
        Self {
            click_decay: rescale_exp_decay(base.click_decay, PLATFORM_SAMPLE_RATE, sr),
            percussion_step: rescale_linear_step(base.percussion_step, PLATFORM_SAMPLE_RATE, sr),
            ..base
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.foldback_hz.is_finite() && self.foldback_hz > 0.0) {
            return Err(ConfigError::FoldbackHz(self.foldback_hz));
        }
        if !(self.output_gain.is_finite() && self.output_gain >= 0.0) {
            return Err(ConfigError::OutputGain(self.output_gain));
        }
        if !(self.click_decay > 0.0 && self.click_decay <= 1.0) {
            return Err(ConfigError::ClickDecay(self.click_decay));
        }
        if !(self.percussion_step.is_finite() && self.percussion_step >= 0.0) {
            return Err(ConfigError::PercussionStep(self.percussion_step));
        }
        if !self.note_on_level.is_finite() {
            return Err(ConfigError::NoteOnLevel(self.note_on_level));
        }
        if !self.initial_percussion_envelope.is_finite() {
            return Err(ConfigError::InitialPercussion(self.initial_percussion_envelope));
        }
        Ok(())
    }
}

/// Rejected configuration value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    FoldbackHz(f32),
    OutputGain(f32),
    ClickDecay(f32),
    PercussionStep(f32),
    NoteOnLevel(f32),
    InitialPercussion(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FoldbackHz(v) => write!(f, "foldback ceiling must be a positive frequency, got {v}"),
            ConfigError::OutputGain(v) => write!(f, "output gain must be finite and non-negative, got {v}"),
            ConfigError::ClickDecay(v) => write!(f, "click decay must be in (0, 1], got {v}"),
            ConfigError::PercussionStep(v) => write!(f, "percussion step must be finite and non-negative, got {v}"),
            ConfigError::NoteOnLevel(v) => write!(f, "note-on level must be finite, got {v}"),
            ConfigError::InitialPercussion(v) => write!(f, "initial percussion envelope must be finite, got {v}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

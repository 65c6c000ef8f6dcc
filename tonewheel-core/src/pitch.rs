//! Pitch helpers: note number → Hz, and note/fine pair → per-sample phase increment.
//!
//! Phase increments are expressed in **cycles per sample**, matching
//! [`sin_cycles`](crate::dsp::sin_cycles) whose period is 1.0.

use crate::dsp::{clamp, lerp, m_exp};
use core::f32::consts::LN_2;

/// Reference sample rate of the target platform.
pub const PLATFORM_SAMPLE_RATE: f32 = 48_000.0;

/// Highest note index understood by the note table (152 entries).
pub const NOTE_MAX: u8 = 151;

/// Frequency ceiling applied to every converted pitch.
pub const NOTE_MAX_HZ: f32 = 23_679.643_054;

/// Scale applied to the fine byte (`1 / 255`) when interpolating between notes.
pub const NOTE_FINE_SCALE: f32 = 0.003_921_568_627_450_98;

/// Equal-tempered frequency for a note number, A4 (69) = 440 Hz.
///
/// Notes above [`NOTE_MAX`] are treated as [`NOTE_MAX`]; the result never
/// exceeds [`NOTE_MAX_HZ`].
#[inline]
pub fn note_hz(note: u8) -> f32 {
    let n = f32::from(note.min(NOTE_MAX));
    let hz = 440.0 * m_exp(LN_2 * (n - 69.0) / 12.0);
    clamp(hz, 0.0, NOTE_MAX_HZ)
}

/// Frequency for a note plus a fine offset (0..=255 spans one semitone).
#[inline]
pub fn note_fine_hz(note: u8, fine: u8) -> f32 {
    let f0 = note_hz(note);
    let f1 = note_hz(note.saturating_add(1));
    lerp(f0, f1, f32::from(fine) * NOTE_FINE_SCALE).min(NOTE_MAX_HZ)
}

/// Per-sample phase increment (cycles/sample) for a note/fine pair at `sr`.
#[inline]
pub fn w0_for_note(note: u8, fine: u8, sr: f32) -> f32 {
    note_fine_hz(note, fine) / sr.max(1.0)
}

/// Split a 16-bit host pitch word into `(note, fine)`.
#[inline]
pub fn split_pitch(pitch: u16) -> (u8, u8) {
    let [note, fine] = pitch.to_be_bytes();
    (note, fine)
}

/// Build a 16-bit host pitch word from `(note, fine)`.
#[inline]
pub fn join_pitch(note: u8, fine: u8) -> u16 {
    u16::from_be_bytes([note, fine])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_440() {
        assert!((note_hz(69) - 440.0).abs() < 0.01);
        assert!((note_hz(81) - 880.0).abs() < 0.05);
        assert!((note_hz(57) - 220.0).abs() < 0.01);
    }

    #[test]
    fn high_notes_are_capped() {
        assert!(note_hz(255) <= NOTE_MAX_HZ);
        assert_eq!(note_hz(200), note_hz(NOTE_MAX));
    }

    #[test]
    fn fine_interpolates_towards_next_note() {
        let lo = note_hz(60);
        let hi = note_hz(61);
        let mid = note_fine_hz(60, 128);
        assert!(mid > lo && mid < hi, "lo={lo} mid={mid} hi={hi}");
        assert!((note_fine_hz(60, 255) - hi).abs() < 1e-2);
    }

    #[test]
    fn w0_is_hz_over_sample_rate() {
        let w0 = w0_for_note(69, 0, PLATFORM_SAMPLE_RATE);
        assert!((w0 - 440.0 / 48_000.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_word_splits_high_byte_note() {
        assert_eq!(split_pitch(0x3C80), (60, 128));
        assert_eq!(join_pitch(60, 128), 0x3C80);
    }
}

#![cfg_attr(not(feature = "std"), no_std)]
//! Tonewheel Core: no_std-ready DSP helpers for the tonewheel oscillator.
//!
//! Features
//! - `std`      : (default) use the Rust standard library
//! - `no-std`   : build with `#![no_std]` and use the `libm` math backend
//! - `micromath`: use `micromath` as the math backend instead
//! - `fast-math`: polynomial sine instead of the backend's exact one
//!
//! Modules
//! - [`dsp`]       : math backend, sine in cycles, cubic saturation, Q31 and parameter conversion
//! - [`pitch`]     : note → Hz, note/fine → phase increment, pitch word packing
//! - [`noise`]     : xorshift white noise
//! - [`envelopes`] : exponential and linear fixed-decay envelopes
//!
//! Design
//! - No heap allocations; every helper is a pure function or a small `Copy` state
//! - Friendly to embedded / real-time targets

#[cfg(not(any(feature = "std", feature = "no-std", feature = "micromath")))]
compile_error!("tonewheel-core needs a math backend: enable `std` (default), `no-std` or `micromath`");

pub mod dsp;
pub mod envelopes;
pub mod noise;
pub mod pitch;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{
        clamp, f32_to_q31, lerp, param_val_to_f32, q31_to_f32, sat_cubic, sin_cycles, TAU,
    };
    pub use crate::envelopes::{ExpDecay, LinearDecay};
    pub use crate::noise::WhiteNoise;
    pub use crate::pitch::{note_hz, split_pitch, w0_for_note, PLATFORM_SAMPLE_RATE};
}
